//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping IO và domain errors.

use biblio_core::CoreError;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === IO errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // === Format errors ===
    #[error("Malformed record in {file} at line {line}: {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },

    // === Domain errors ===
    /// Record đọc đúng format nhưng store từ chối (ISBN trùng, quá
    /// sức chứa, ...)
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] CoreError),
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo Malformed error
    pub fn malformed(file: &str, line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            file: file.to_string(),
            line,
            reason: reason.into(),
        }
    }

    /// Kiểm tra có phải lỗi format không
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
