//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the given level applies.

use tracing_subscriber::EnvFilter;

fn filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")))
}

/// Initialize the human-readable logger
pub fn init_logger(log_level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}

/// Initialize the JSON logger
pub fn init_json_logger(log_level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter(log_level))
        .with_target(false)
        .try_init();
}
