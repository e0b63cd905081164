//! Tracing initialization and subscriber setup.
//!
//! Configures a `tracing-subscriber` pipeline that filters spans by the
//! configured level and appends plain-text lines to a log file inside the
//! data directory.

use crate::infrastructure::paths;
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber with file-based output.
///
/// # Trace Level Resolution
///
/// 1. `config.trace_level` if set
/// 2. Default: `"info"`
///
/// # File Location
///
/// Log lines are appended to `<data dir>/applock.log`, where the data dir is
/// `config.data_dir` or the platform default.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently bails if the directory or file cannot be created (observability
///   is optional)
/// - Idempotent: safe to call multiple times, only the first call takes effect
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = config
        .data_dir
        .clone()
        .unwrap_or_else(paths::default_data_dir);
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("applock.log"))
    else {
        return;
    };

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        );

    let _ = subscriber.try_init();
}
