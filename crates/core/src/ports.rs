use crate::domain::{MessageEntry, RawMessage};
use std::path::PathBuf;

pub use crate::error::{Error, Result};

/// Read access to a platform message store.
pub trait MessageStore {
    /// Queries the inbox and returns every record in the store's own order.
    /// An inbox with no records is `Ok(vec![])`.
    fn query_inbox(&self) -> Result<Vec<RawMessage>>;
}

/// Trait for persisting normalized entries
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait MessageExporter: Send + Sync {
    /// Writes the entries in order and returns the path of the written file.
    fn export(&self, entries: &[MessageEntry]) -> Result<PathBuf>;
}
