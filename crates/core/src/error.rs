//! # Error Module
//!
//! Định nghĩa các domain errors cho Biblio sử dụng thiserror.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core domain errors.
///
/// Các lỗi nghiệp vụ của thư viện, không liên quan đến infrastructure.
/// Tất cả đều recoverable - caller quyết định xử lý tiếp thế nào.
#[derive(Debug, Error)]
pub enum CoreError {
    // === Catalog errors ===
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Book is not available for borrowing: {0}")]
    BookUnavailable(String),

    #[error("Invalid ISBN, expected exactly 10 digits: {0}")]
    InvalidIsbn(String),

    #[error("ISBN already exists: {0}")]
    DuplicateIsbn(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Catalog is full: capacity {0}")]
    CatalogFull(usize),

    // === Registry errors ===
    #[error("Reader not found: {0}")]
    ReaderNotFound(u32),

    #[error("Reader card expired: reader {reader_id}, expired at {expired_at}")]
    CardExpired {
        reader_id: u32,
        expired_at: DateTime<Utc>,
    },

    #[error("Reader ID already exists: {0}")]
    DuplicateReader(u32),

    #[error("Registry is full: capacity {0}")]
    RegistryFull(usize),

    // === Circulation errors ===
    #[error("Invalid number of books: {0}")]
    InvalidBookCount(usize),

    #[error("Invalid loan index: {0}")]
    InvalidIndex(usize),

    #[error("Loan {loan_id} does not belong to reader {reader_id}")]
    OwnershipMismatch { loan_id: usize, reader_id: u32 },

    #[error("Loan already returned: {0}")]
    AlreadyReturned(usize),

    #[error("Maximum number of loans reached: capacity {0}")]
    CapacityExceeded(usize),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::BookNotFound(_) | CoreError::ReaderNotFound(_))
    }

    /// Kiểm tra có phải lỗi store đầy không
    pub fn is_full(&self) -> bool {
        matches!(
            self,
            CoreError::CatalogFull(_) | CoreError::RegistryFull(_) | CoreError::CapacityExceeded(_)
        )
    }
}
