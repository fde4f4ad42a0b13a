// ============================================================================
// Batch Driver
// Reads an order file, runs it through one engine, writes book and trades
// ============================================================================

use crate::domain::{EngineConfig, Order, OrderBookSnapshot, Trade};
use crate::engine::{create_from_config, BatchSummary};
use crate::interfaces::LoggingEventHandler;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_ORDERS_PATH: &str = "orders.json";
pub const DEFAULT_BOOK_PATH: &str = "orderbook.json";
pub const DEFAULT_TRADES_PATH: &str = "trades.json";

/// Fatal batch failures. Rejected orders are not errors at this level.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] crate::domain::ConfigError),
}

impl BatchError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where the batch reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub orders_path: PathBuf,
    pub book_path: PathBuf,
    pub trades_path: PathBuf,
}

impl BatchConfig {
    pub fn new(
        orders_path: impl Into<PathBuf>,
        book_path: impl Into<PathBuf>,
        trades_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            orders_path: orders_path.into(),
            book_path: book_path.into(),
            trades_path: trades_path.into(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDERS_PATH, DEFAULT_BOOK_PATH, DEFAULT_TRADES_PATH)
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub book: OrderBookSnapshot,
    pub trades: Vec<Trade>,
}

/// Read a JSON array of order requests
pub fn read_orders(path: impl AsRef<Path>) -> Result<Vec<Order>, BatchError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| BatchError::io(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| BatchError::json(path, err))
}

/// Write the final book as `{ "buys": [...], "sells": [...] }`
///
/// `amount` and `limit_price` are written as JSON strings ("0.0023",
/// "63500"), not JSON numbers. Readers that expect the older float-valued
/// book file must parse the strings.
pub fn write_order_book(
    path: impl AsRef<Path>,
    book: &OrderBookSnapshot,
) -> Result<(), BatchError> {
    write_pretty(path.as_ref(), book)
}

/// Write the trade log as a JSON array, oldest first
///
/// `amount` and `price` are JSON strings, the same as in [`write_order_book`].
pub fn write_trades(path: impl AsRef<Path>, trades: &[Trade]) -> Result<(), BatchError> {
    write_pretty(path.as_ref(), trades)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), BatchError> {
    let file = File::create(path).map_err(|err| BatchError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|err| BatchError::json(path, err))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|err| BatchError::io(path, err))
}

/// Run one batch: read every order, process them in file order, write the
/// final book and the trade log.
///
/// Nothing is written if the order file cannot be read or decoded.
pub fn run(batch: &BatchConfig, config: EngineConfig) -> Result<BatchReport, BatchError> {
    let orders = read_orders(&batch.orders_path)?;
    tracing::info!(
        path = %batch.orders_path.display(),
        count = orders.len(),
        "Loaded orders"
    );

    let mut engine = create_from_config(config, Arc::new(LoggingEventHandler))?;
    let summary = engine.process_batch(&orders);

    let book = engine.snapshot();
    let trades = engine.trades().to_vec();

    write_order_book(&batch.book_path, &book)?;
    write_trades(&batch.trades_path, &trades)?;

    tracing::info!(
        received = summary.received,
        rejected = summary.rejected(),
        trades = trades.len(),
        buys = book.buys.len(),
        sells = book.sells.len(),
        "Processing complete. Order book saved to {} and trades saved to {}",
        batch.book_path.display(),
        batch.trades_path.display()
    );

    Ok(BatchReport {
        summary,
        book,
        trades,
    })
}
