//! Error types for the mapshade application.
//!
//! Every error here is terminal for the current session: the session reports
//! the message and ends. There are no retryable failure modes.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for mapshade operations.
#[derive(Error, Debug)]
pub enum MapshadeError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The user-specified shapefile directory does not exist
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The directory exists but contains no .shp files
    #[error("No shapefiles found in directory: {path}")]
    NoShapefilesFound { path: PathBuf },

    /// Bad file-selection index or non-numeric input
    #[error("Invalid selection '{input}': expected a number between 1 and {count}")]
    InvalidSelection { input: String, count: usize },

    /// Shapefile/dBASE load failures, wrapping the loader's message
    #[error("Failed to load {path}: {message}")]
    TableLoad { path: PathBuf, message: String },

    /// The requested attribute column is not in the loaded table
    #[error("Column '{column}' does not exist in the shapefile (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Unrecognized scheme category or palette name
    #[error("Invalid scheme: {message}")]
    InvalidScheme { message: String },

    /// A dual gradient needs exactly two color stops
    #[error("Invalid gradient: expected exactly 2 color stops, got {count}")]
    InvalidGradient { count: usize },

    /// A color stop could not be parsed
    #[error("Invalid color: {message}")]
    InvalidColor { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Image rendering or encoding errors
    #[error("Render error: {message}")]
    Render { message: String },
}

/// Convenience type alias for Results with MapshadeError
pub type Result<T> = std::result::Result<T, MapshadeError>;
