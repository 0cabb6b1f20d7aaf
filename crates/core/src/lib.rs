//! # Biblio Core
//!
//! Core domain types cho hệ thống quản lý thư viện:
//! - [`Book`] / [`Catalog`]: danh mục sách và số bản còn lại để cho mượn
//! - [`Reader`] / [`Registry`]: sổ đăng ký độc giả và thẻ mượn
//! - [`Loan`]: phiếu mượn (sở hữu bởi circulation ledger)
//! - [`fine`]: chính sách tiền phạt (pure functions)
//!
//! Crate này chỉ chứa domain logic thuần túy - không IO, không async.

pub mod book;
pub mod error;
pub mod fine;
pub mod loan;
pub mod reader;

pub use book::{Book, BookPatch, Catalog, Isbn, MAX_BOOKS};
pub use error::{CoreError, CoreResult};
pub use fine::{late_fine, lost_book_fine, FINE_PER_DAY};
pub use loan::{Loan, LoanId, LOAN_PERIOD_DAYS, MAX_BOOKS_PER_LOAN};
pub use reader::{
    Gender, Reader, ReaderPatch, Registration, Registry, CARD_VALIDITY_DAYS, MAX_READERS,
};
