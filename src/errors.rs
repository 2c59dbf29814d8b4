//! Error types for the keepsake application.
//!
//! This module defines custom error types that categorize the failures
//! that can occur while managing journal entries.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the keepsake application.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required field was empty when creating an entry.
    #[error("{message}")]
    Validation { message: String },

    /// A payload could not be embedded as entry content.
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    /// The selected file is not an image type the gallery understands.
    #[error("Unsupported image file: {file_path}")]
    UnsupportedImage { file_path: String },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    #[error("{message}")]
    EditorError { message: String },

    /// Entry was not found when the shell asked for it by id.
    #[error("Entry not found: {id}")]
    EntryNotFound { id: String },
}

impl JournalError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        JournalError::Validation {
            message: message.into(),
        }
    }

    /// Whether the error is a user-recoverable validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, JournalError::Validation { .. })
    }
}
