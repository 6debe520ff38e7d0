use thiserror::Error;

/// Result type for jparse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the front end.
///
/// Recoverable syntax problems never surface through this enum; they are absorbed
/// by the parser and reported as [`crate::parser::diagnostics::Problem`] events.
/// Only conditions that abort an entire compilation unit live here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source read aborted at offset {offset}: {message}")]
    SourceAbort { offset: usize, message: String },

    #[error("parser tables are corrupted: {message}")]
    Tables { message: String },

    #[error("internal parser error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a fatal source-abort error
    pub fn source_abort(offset: usize, message: impl Into<String>) -> Self {
        Self::SourceAbort { offset, message: message.into() }
    }

    /// Create a table-corruption error
    pub fn tables(message: impl Into<String>) -> Self {
        Self::Tables { message: message.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}
