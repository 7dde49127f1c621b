//! Logging setup for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install the global tracing subscriber.
///
/// Events are written to stderr, filtered by the `RUST_LOG` environment
/// variable, or by `default_directive` (e.g. "warn") when it is not set. If
/// `log_file` is given, debug events are also appended to that file.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn setup_logging(default_directive: &str, log_file: Option<&Path>) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(env_filter);

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
