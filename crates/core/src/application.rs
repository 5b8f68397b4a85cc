use crate::domain::{MessageEntry, RawMessage};
use crate::ports::{MessageExporter, MessageStore, Result};
use crate::utils::now_epoch_millis;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Reads the inbox of a message store and normalizes every record
pub struct MessageReader {
    store: Box<dyn MessageStore>,
}

impl MessageReader {
    pub fn new(store: Box<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Performs one blocking pass over the inbox and returns the fully
    /// materialized entries in the store's order.
    ///
    /// Fails with `PermissionDenied` or `SourceUnavailable` as reported by the
    /// store; an empty inbox is an empty vector.
    pub fn read(&self) -> Result<Vec<MessageEntry>> {
        let records = self.store.query_inbox()?;
        debug!(records = records.len(), "queried inbox");

        let entries: Vec<MessageEntry> = records.into_iter().map(normalize).collect();
        info!(entries = entries.len(), "read inbox");
        Ok(entries)
    }
}

fn normalize(record: RawMessage) -> MessageEntry {
    if record.has_missing_fields() {
        warn!(
            missing_sender = record.address.is_none(),
            missing_body = record.body.is_none(),
            missing_date = record.date.is_none(),
            "substituting defaults"
        );
    }
    MessageEntry::from_raw(record, now_epoch_millis)
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    pub path: PathBuf,
}

/// Application service that reads the inbox and exports it in one call
pub struct ExportServiceImpl {
    reader: MessageReader,
    exporter: Box<dyn MessageExporter>,
}

impl ExportServiceImpl {
    /// Creates a new ExportServiceImpl with the given dependencies
    pub fn new(reader: MessageReader, exporter: Box<dyn MessageExporter>) -> Self {
        Self { reader, exporter }
    }

    /// Executes the export process: reads entries and hands them to the exporter
    pub fn execute_export(&self) -> Result<ExportSummary> {
        let entries = self.reader.read()?;
        let path = self.exporter.export(&entries)?;
        info!(exported = entries.len(), path = %path.display(), "export finished");
        Ok(ExportSummary {
            exported: entries.len(),
            path,
        })
    }
}
