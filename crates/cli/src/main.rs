use clap::{ArgAction, Parser};
use csv_adapter::{CsvExporter, ReplaceStrategy};
use readsms_core::application::{ExportServiceImpl, MessageReader};
use readsms_core::domain::MessageEntry;
use readsms_core::ports::{Error, MessageExporter, MessageStore, Result};
use readsms_core::utils::format_received_at;
use sqlite_adapter::SqliteMessageStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

/// Stands in for the downloads directory when the platform has none
const DOWNLOADS_PLACEHOLDER: &str = "<downloads>";

/// Exit code when the store refused access
const EXIT_PERMISSION_DENIED: u8 = 2;
/// Exit code when the store could not be opened
const EXIT_SOURCE_UNAVAILABLE: u8 = 3;
/// Exit code when the destination directory is missing or unwritable
const EXIT_DESTINATION_UNAVAILABLE: u8 = 4;
/// Exit code for write/flush failures
const EXIT_IO_FAILURE: u8 = 5;

/// CLI tool to export the SMS inbox of an Android telephony database as CSV
#[derive(Parser, Debug)]
#[command(name = "readsms")]
#[command(about = "Exports received SMS messages from a telephony database to messages.csv")]
struct Cli {
    /// Path to the telephony SQLite database (mmssms.db)
    #[arg(short = 'i', long = "input-db", required = true)]
    input_db: PathBuf,

    /// Directory that receives messages.csv [default: the downloads directory]
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Print the inbox instead of exporting it
    #[arg(long)]
    list: bool,

    /// Write to a temporary file and rename it over the previous export
    #[arg(long)]
    atomic: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    // Instantiate concrete implementations of secondary adapters
    let store: Box<dyn MessageStore> = Box::new(SqliteMessageStore::new(cli.input_db.clone()));
    let reader = MessageReader::new(store);

    if cli.list {
        for entry in reader.read()? {
            println!("{}", render_entry(&entry));
        }
        return Ok(());
    }

    let output_dir = resolve_output_dir(cli.output_dir.as_deref(), dirs::download_dir())?;
    let strategy = if cli.atomic {
        ReplaceStrategy::AtomicRename
    } else {
        ReplaceStrategy::DeleteThenWrite
    };
    let exporter: Box<dyn MessageExporter> =
        Box::new(CsvExporter::new(output_dir).with_strategy(strategy));

    let service = ExportServiceImpl::new(reader, exporter);
    let summary = service.execute_export()?;
    println!(
        "Successfully exported {} messages to {}",
        summary.exported,
        summary.path.display()
    );
    Ok(())
}

/// An explicit directory wins over the platform downloads directory.
fn resolve_output_dir(explicit: Option<&Path>, downloads: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => downloads.ok_or_else(|| Error::DestinationUnavailable {
            path: PathBuf::from(DOWNLOADS_PLACEHOLDER),
            reason: "no downloads directory on this platform; pass --output-dir".to_string(),
        }),
    }
}

/// Sender and received time on one line, body underneath.
fn render_entry(entry: &MessageEntry) -> String {
    format!(
        "{}  {}\n{}\n",
        entry.sender(),
        format_received_at(entry.received_at_epoch_millis()),
        entry.body()
    )
}

fn exit_code(error: &Error) -> u8 {
    match error {
        Error::PermissionDenied(_) => EXIT_PERMISSION_DENIED,
        Error::SourceUnavailable(_) => EXIT_SOURCE_UNAVAILABLE,
        Error::DestinationUnavailable { .. } => EXIT_DESTINATION_UNAVAILABLE,
        Error::Io(_) => EXIT_IO_FAILURE,
    }
}
