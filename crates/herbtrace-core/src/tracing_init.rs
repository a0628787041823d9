//! Shared tracing/logging initialization.
//!
//! The headless commands log to stderr; the terminal UI hands in a file
//! writer so log lines never land on the alternate screen.

use std::io;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global tracing subscriber writing to stderr.
///
/// * `default_filter` -- default `RUST_LOG` value when the env-var is not set
///   (e.g. `"herbtrace=info"`).
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    init_tracing_with_writer(default_filter, log_json, io::stderr);
}

/// Initialise the global tracing subscriber appending to `file`.
pub fn init_file_tracing(default_filter: &str, log_json: bool, file: std::fs::File) {
    init_tracing_with_writer(default_filter, log_json, Mutex::new(file));
}

fn init_tracing_with_writer<W>(default_filter: &str, log_json: bool, writer: W)
where
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }
}
