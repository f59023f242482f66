//! Error types for Stateline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatelineError {
    // Path errors
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    // Format errors
    #[error("{format} error: {message}")]
    Format { format: String, message: String },

    // Region lookup errors (strict expansion only; the default expansion
    // silently ignores unknown names)
    #[error("Unknown region or subregion: {name}")]
    UnknownRegion { name: String },

    // Reprojection errors
    #[error("Reprojection from EPSG:{from} to EPSG:{to} failed: {message}")]
    Projection { from: u32, to: u32, message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, StatelineError>;
