//! In-memory message store.

use crate::domain::RawMessage;
use crate::ports::{Error, MessageStore, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Granted,
    Denied,
    Unavailable,
}

/// A message store backed by a vector, for tests and embedding callers that
/// already hold the records.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    records: Vec<RawMessage>,
    access: Access,
}

impl InMemoryStore {
    pub fn new(records: Vec<RawMessage>) -> Self {
        Self {
            records,
            access: Access::Granted,
        }
    }

    /// A store that refuses every query with `PermissionDenied`.
    pub fn denied() -> Self {
        Self {
            records: Vec::new(),
            access: Access::Denied,
        }
    }

    /// A store that cannot be opened.
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            access: Access::Unavailable,
        }
    }
}

impl MessageStore for InMemoryStore {
    fn query_inbox(&self) -> Result<Vec<RawMessage>> {
        match self.access {
            Access::Granted => Ok(self.records.clone()),
            Access::Denied => Err(Error::PermissionDenied(
                "in-memory store refused the inbox query".to_string(),
            )),
            Access::Unavailable => Err(Error::SourceUnavailable(
                "in-memory store is closed".to_string(),
            )),
        }
    }
}
