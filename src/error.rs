use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unsupported file format for: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Data processing error (Polars)")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Spreadsheet error (Calamine)")]
    Calamine(#[from] calamine::Error),

    #[error("Missing required columns: {missing:?} (available: {available:?})")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Attachment file not found: {0}")]
    AttachmentNotFound(PathBuf),

    #[error("Failed to open chat: {0}")]
    OpenChat(String),

    #[error("Failed to copy file to clipboard: {0}")]
    Clipboard(String),
}
