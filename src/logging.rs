//! File logging.
//!
//! The terminal belongs to the screen, so log records go to a file.
//! Filter from `MENTALITTY_LOG` or `RUST_LOG` (default: `info`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;

pub const LOG_FILE: &str = "mentalitty.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("MENTALITTY_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global subscriber writing to `dir/mentalitty.log`.
///
/// Keep the returned guard alive until exit; dropping it flushes the
/// writer thread.
pub fn init_file_logging(dir: impl AsRef<Path>) -> Result<WorkerGuard> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::never(dir, LOG_FILE));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
