//! Logging utilities for mapshade.
//!
//! This module provides structured logging so a session leaves a usable
//! trace of what was loaded, selected and rendered.

use std::time::Instant;
use tracing::{debug, error, info};

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();

    debug!(operation = operation, "Starting operation");

    let result = f();

    info!(
        operation = operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log detailed information about a loaded attribute table
pub fn log_table_stats(file_path: &str, feature_count: usize, column_count: usize, skipped: usize) {
    info!(
        operation = "table_load",
        file_path = file_path,
        feature_count = feature_count,
        column_count = column_count,
        skipped_shapes = skipped,
        "Table loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::MapshadeError, context: &str) {
    error!(
        error = %error,
        context = context,
        "Error occurred"
    );
}
