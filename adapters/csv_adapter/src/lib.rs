//! CSV export of normalized inbox entries.
//!
//! Output is `messages.csv` in a caller-chosen directory:
//!
//! ```text
//! received,contact_name,message
//! <epoch-millis>,<sender>,<percent-encoded body>
//! ```
//!
//! The sender is written as-is; only the body is encoded (see [`encoding`]).

pub mod encoding;

pub use encoding::{decode_body, encode_body};

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use readsms_core::domain::MessageEntry;
use readsms_core::ports::{Error, MessageExporter, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the export file inside the destination directory.
pub const EXPORT_FILE_NAME: &str = "messages.csv";

/// Staging name used by [`ReplaceStrategy::AtomicRename`].
pub const STAGING_FILE_NAME: &str = "messages.csv.tmp";

/// Header row of the export file.
pub const HEADER: [&str; 3] = ["received", "contact_name", "message"];

/// How an existing export file is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplaceStrategy {
    /// Delete the old file, then write the new one in place. A concurrent
    /// reader may see no file, or a partial one.
    #[default]
    DeleteThenWrite,
    /// Write to a staging file in the same directory and rename it over the
    /// old one.
    AtomicRename,
}

/// Writes entries to `<output_dir>/messages.csv`
pub struct CsvExporter {
    output_dir: PathBuf,
    strategy: ReplaceStrategy,
}

impl CsvExporter {
    /// Creates an exporter targeting `output_dir`. The directory is never created.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            strategy: ReplaceStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ReplaceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(EXPORT_FILE_NAME)
    }

    fn check_destination(&self) -> Result<()> {
        let metadata = fs::metadata(&self.output_dir)
            .map_err(|err| self.destination_error(&self.output_dir, err))?;
        if !metadata.is_dir() {
            return Err(self.unavailable(&self.output_dir, "not a directory"));
        }
        if metadata.permissions().readonly() {
            return Err(self.unavailable(&self.output_dir, "directory is read-only"));
        }
        Ok(())
    }

    fn unavailable(&self, path: &Path, reason: &str) -> Error {
        Error::DestinationUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Missing directories and refused access are destination problems;
    /// anything else is an ordinary I/O failure.
    fn destination_error(&self, path: &Path, err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::NotFound => self.unavailable(path, "directory does not exist"),
            io::ErrorKind::PermissionDenied => self.unavailable(path, "directory is not writable"),
            _ => Error::Io(err),
        }
    }

    fn remove_existing(&self, target: &Path) -> Result<()> {
        match fs::remove_file(target) {
            Ok(()) => {
                debug!(path = %target.display(), "removed previous export");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.destination_error(&self.output_dir, err)),
        }
    }

    fn write_entries(&self, path: &Path, entries: &[MessageEntry]) -> Result<()> {
        let file = File::create(path).map_err(|err| self.destination_error(&self.output_dir, err))?;
        let mut writer = csv_writer(file);

        writer.write_record(HEADER).map_err(write_failure)?;
        for entry in entries {
            writer
                .write_record([
                    entry.received_at_epoch_millis().to_string().as_str(),
                    entry.sender(),
                    encode_body(entry.body()).as_str(),
                ])
                .map_err(write_failure)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Fields are never quoted: the body is already encoded and the sender is
/// written raw. Rows end with a bare `\n`.
fn csv_writer(file: File) -> Writer<File> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file)
}

fn write_failure(err: csv::Error) -> Error {
    Error::Io(io::Error::from(err))
}

impl MessageExporter for CsvExporter {
    fn export(&self, entries: &[MessageEntry]) -> Result<PathBuf> {
        self.check_destination()?;
        let target = self.output_path();

        match self.strategy {
            ReplaceStrategy::DeleteThenWrite => {
                self.remove_existing(&target)?;
                self.write_entries(&target, entries)?;
            }
            ReplaceStrategy::AtomicRename => {
                let staging = self.output_dir.join(STAGING_FILE_NAME);
                self.write_entries(&staging, entries)?;
                if let Err(err) = fs::rename(&staging, &target) {
                    let _ = fs::remove_file(&staging);
                    return Err(err.into());
                }
            }
        }

        info!(entries = entries.len(), path = %target.display(), "wrote export");
        Ok(target)
    }
}
