//! Unified error handling for rwscene
//!
//! One error type covers the whole pipeline, from binary archive decoding
//! to manifest interpretation and scene assembly.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all rwscene operations
#[derive(Error, Debug)]
pub enum Error {
    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// No game-version marker file present in the install root
    #[error("No supported game version detected in {root}")]
    UnsupportedVersion { root: PathBuf },

    /// Invalid magic bytes at file start
    #[error("Invalid magic bytes: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        found: Vec<u8>,
    },

    /// Structurally broken manifest line
    #[error("Manifest parse error in {path} line {line}: {message}")]
    ManifestParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Malformed definition or placement record
    #[error("Invalid record in {path} line {line}: {message}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Archive entry range extends past the backing file
    #[error("Entry '{name}' out of bounds: offset {offset} + size {size} exceeds file length {file_len}")]
    EntryOutOfBounds {
        name: String,
        offset: u64,
        size: u64,
        file_len: u64,
    },

    /// Entry not found in archive
    #[error("Archive entry not found: {name}")]
    EntryNotFound { name: String },

    /// Archive structure is corrupted
    #[error("Archive corrupted at offset {offset}: {message}")]
    ArchiveCorrupted { offset: u64, message: String },

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an archive-corruption error
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Error::ArchiveCorrupted {
            offset,
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::FileNotFound(_) | Error::EntryNotFound { .. })
    }

    /// Check if this is a parse/format error
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMagic { .. }
                | Error::ManifestParse { .. }
                | Error::InvalidRecord { .. }
                | Error::EntryOutOfBounds { .. }
                | Error::ArchiveCorrupted { .. }
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
