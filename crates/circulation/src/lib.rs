//! # Biblio Circulation
//!
//! Sổ cái lưu thông của thư viện: tạo lượt mượn, ghi nhận trả sách,
//! suy ra danh sách quá hạn. Ledger giữ toàn bộ lịch sử mượn trong
//! bộ nhớ; Catalog và Registry được truyền vào theo reference cho
//! từng operation.

pub mod ledger;

pub use ledger::{CirculationLedger, MAX_LOANS};
