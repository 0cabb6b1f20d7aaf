//! # Fine Module
//!
//! Chính sách tiền phạt của thư viện. Phạt tính bằng VND nguyên
//! (i64); giá bìa dùng rust_decimal để nhân đôi không mất chính xác
//! rồi mới cắt về VND nguyên.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Mức phạt mỗi ngày trễ hạn (VND)
pub const FINE_PER_DAY: i64 = 5000;

/// Tiền phạt trả trễ.
///
/// Chỉ tính những ngày trễ TRỌN VẸN: trả trễ 23 tiếng chưa bị phạt,
/// trễ đúng 24 tiếng phạt một ngày. Trả đúng hạn hoặc sớm thì phạt 0.
///
/// # Examples
/// ```
/// use biblio_core::late_fine;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let due = Utc.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap();
/// assert_eq!(late_fine(due, due), 0);
/// assert_eq!(late_fine(due, due + Duration::hours(23)), 0);
/// assert_eq!(late_fine(due, due + Duration::days(2)), 10_000);
/// ```
pub fn late_fine(due_at: DateTime<Utc>, returned_at: DateTime<Utc>) -> i64 {
    if returned_at <= due_at {
        return 0;
    }
    let days_late = (returned_at - due_at).num_days();
    days_late * FINE_PER_DAY
}

/// Tiền đền sách mất: gấp đôi giá bìa, cắt về VND nguyên.
///
/// Hàm độc lập, không gắn vào vòng đời Loan; thủ thư gọi riêng khi
/// độc giả báo mất sách.
pub fn lost_book_fine(price: Decimal) -> i64 {
    (price * Decimal::TWO).trunc().to_i64().unwrap_or(0)
}
