// ============================================================================
// matcher
// Batch entry point: orders.json in, orderbook.json and trades.json out
// ============================================================================

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use spot_matcher::batch::{self, BatchConfig};
use spot_matcher::domain::{EngineConfig, DEFAULT_INSTRUMENT};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of order requests to process
    #[arg(long, env = "MATCHER_ORDERS", default_value = batch::DEFAULT_ORDERS_PATH)]
    orders: PathBuf,

    /// Where the final order book is written
    #[arg(long, env = "MATCHER_BOOK_OUT", default_value = batch::DEFAULT_BOOK_PATH)]
    book_out: PathBuf,

    /// Where the trade log is written
    #[arg(long, env = "MATCHER_TRADES_OUT", default_value = batch::DEFAULT_TRADES_PATH)]
    trades_out: PathBuf,

    /// The only trading pair accepted
    #[arg(long, env = "MATCHER_PAIR", default_value = DEFAULT_INSTRUMENT)]
    pair: String,

    /// Also append log lines to this file
    #[arg(long, env = "MATCHER_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[arg(long, env = "MATCHER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_logging(format: LogFormat, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file)))
        },
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    match format {
        LogFormat::Text => builder.with_ansi(log_file.is_none()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|err| anyhow!(err))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format, args.log_file.as_deref())?;

    let batch = BatchConfig::new(args.orders, args.book_out, args.trades_out);
    let config = EngineConfig::new(args.pair);

    let report = batch::run(&batch, config).with_context(|| {
        format!("batch run over {} failed", batch.orders_path.display())
    })?;

    tracing::info!(
        created = report.summary.created,
        deleted = report.summary.deleted,
        missed_deletes = report.summary.missed_deletes,
        rejected = report.summary.rejected(),
        "Batch finished"
    );

    Ok(())
}
