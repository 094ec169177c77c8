use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{PipelineError, Result};

pub const LOG_FILE_PREFIX: &str = "pdf_digest.log";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` level.
///
/// When `log_dir` is given, a daily-rolling file gets a plain-text copy of every event.
/// The returned guard flushes that file on drop and must be held for the whole run.
pub fn init_tracing(json: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let json_layer = json.then(|| fmt::layer().json());
    let text_layer = (!json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PipelineError::Unexpected(format!("Failed to initialise logging: {}", e)))?;

    Ok(guard)
}
