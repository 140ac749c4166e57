use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use pdfsieve::export::{ExportTrigger, FileExporter};
use pdfsieve::storage::SqliteStore;
use pdfsieve::tracking::InFlightTracker;

#[derive(Parser)]
#[command(name = "pdfsieve")]
#[command(version = "0.1.0")]
#[command(about = "Exports the PDFs captured by a pdfsieve-embedding host")]
struct Args {
    /// Capture database to drain
    #[arg(long, env = "PDFSIEVE_DB", default_value = SqliteStore::DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Directory the exported files are written to
    #[arg(long, env = "PDFSIEVE_OUT", default_value = ".")]
    out: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();

    let store = match SqliteStore::open(&args.db).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Unable to open capture database {}: {}", args.db.display(), e);
            std::process::exit(1);
        }
    };

    // Captures happen in the embedding host; this process issues no writes
    // of its own, so its barrier snapshot is always empty.
    let tracker = Arc::new(InFlightTracker::new());
    let exporter = Arc::new(FileExporter::new(&args.out));
    let trigger = ExportTrigger::new(tracker, store, exporter);

    match trigger.run().await {
        Ok(count) => info!("exported {} captured PDF(s) to {}", count, args.out.display()),
        Err(e) => {
            error!("Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
