//! Error types for the dashboard.
//!
//! Only [`ConfigError`] is ever fatal. Acquisition and display errors are
//! logged by the loop and replaced by defaults.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read data from one of the collaborators (metrics, drives, touch).
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("metrics unavailable: {0}")]
    Metrics(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("share command `{command}` failed: {reason}")]
    ShareCommand { command: String, reason: String },

    #[error("touch sensor read failed: {0}")]
    Touch(String),
}

/// Startup configuration problem.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure handing a finished frame to the panel.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("display I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("frame is {actual_width}x{actual_height}, display expects {expected_width}x{expected_height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

pub type Result<T, E = AcquisitionError> = std::result::Result<T, E>;
