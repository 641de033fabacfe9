//! Error types for launchboard.
//!
//! This module defines all error types used throughout the launchboard crate.
//! Only startup can fail: once a dataset is loaded, view computation is total.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for launchboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// Failed to fetch the dataset over the network.
    #[error("failed to fetch dataset from {url}: {source}")]
    DatasetFetch {
        /// URL that was requested.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to read the dataset from disk.
    #[error("failed to read dataset at {path}: {source}")]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A dataset row could not be parsed.
    #[error("failed to parse dataset: {0}")]
    DatasetParse(#[from] csv::Error),

    /// The dataset header lacks a required column.
    #[error("dataset is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// The dataset contained a header but no rows.
    #[error("dataset from {source_name} contains no records")]
    EmptyDataset {
        /// Description of where the dataset came from.
        source_name: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// Failed to bind the HTTP listener.
    #[error("failed to bind {addr}: {source}")]
    ServerBind {
        /// Address that could not be bound.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for launchboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a missing column error.
    #[must_use]
    pub fn missing_column(column: &'static str) -> Self {
        Self::MissingColumn { column }
    }

    /// Check if this error happened while loading the dataset.
    #[must_use]
    pub fn is_dataset_error(&self) -> bool {
        matches!(
            self,
            Self::DatasetFetch { .. }
                | Self::DatasetRead { .. }
                | Self::DatasetParse(_)
                | Self::MissingColumn { .. }
                | Self::EmptyDataset { .. }
        )
    }
}
