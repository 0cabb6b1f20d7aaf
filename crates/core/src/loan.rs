//! # Loan Module
//!
//! Định nghĩa Loan - một lượt mượn sách. Loan chỉ chuyển trạng thái
//! một chiều Active → Returned và không bao giờ bị xóa; lịch sử mượn
//! là sổ cái của thư viện.

use crate::book::Isbn;
use crate::fine::late_fine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thời hạn mượn: 7 ngày kể từ lúc mượn
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Số sách tối đa trong một lượt mượn
pub const MAX_BOOKS_PER_LOAN: usize = 5;

/// Mã lượt mượn: index ổn định trong sổ cái (loans không bị xóa)
pub type LoanId = usize;

/// Một lượt mượn sách.
///
/// `returned_at` là `None` khi lượt mượn còn mở. Danh sách ISBN giữ
/// nguyên thứ tự người mượn đưa vào.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Mã độc giả mượn
    pub reader_id: u32,
    /// Thời điểm mượn
    pub borrowed_at: DateTime<Utc>,
    /// Hạn trả
    pub due_at: DateTime<Utc>,
    /// Thời điểm trả; `None` khi chưa trả
    pub returned_at: Option<DateTime<Utc>>,
    /// Các ISBN đã mượn, theo thứ tự đưa vào
    pub isbns: Vec<Isbn>,
}

impl Loan {
    /// Tạo lượt mượn mới; hạn trả = thời điểm mượn + [`LOAN_PERIOD_DAYS`].
    ///
    /// Constructor không validate số sách hay tồn kho; ledger làm việc
    /// đó trước khi tạo Loan.
    pub fn new(reader_id: u32, isbns: Vec<Isbn>, borrowed_at: DateTime<Utc>) -> Self {
        Self {
            reader_id,
            borrowed_at,
            due_at: borrowed_at + Duration::days(LOAN_PERIOD_DAYS),
            returned_at: None,
            isbns,
        }
    }

    /// Lượt mượn đã đóng chưa
    pub fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }

    /// Quá hạn tại thời điểm `now`: chưa trả và đã qua hạn trả
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_returned() && now > self.due_at
    }

    /// Số sách trong lượt mượn
    pub fn book_count(&self) -> usize {
        self.isbns.len()
    }

    /// Tiền phạt tạm tính tại thời điểm `now`.
    ///
    /// Lượt đã trả không còn nợ phạt; phạt lúc trả đã chốt qua
    /// [`late_fine`] với `returned_at`.
    pub fn outstanding_fine(&self, now: DateTime<Utc>) -> i64 {
        if self.is_returned() {
            0
        } else {
            late_fine(self.due_at, now)
        }
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_returned() { "returned" } else { "active" };
        write!(
            f,
            "reader #{} - {} book(s), due {} ({})",
            self.reader_id,
            self.book_count(),
            self.due_at.format("%Y-%m-%d"),
            state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn isbns(list: &[&str]) -> Vec<Isbn> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_new_loan_due_in_seven_days() {
        let borrowed = at(2024, 5, 1);
        let loan = Loan::new(1, isbns(&["1234567890"]), borrowed);

        assert_eq!(loan.due_at, borrowed + Duration::days(7));
        assert!(!loan.is_returned());
        assert_eq!(loan.book_count(), 1);
    }

    #[test]
    fn test_overdue_transitions() {
        let borrowed = at(2024, 5, 1);
        let mut loan = Loan::new(1, isbns(&["1234567890", "2222222222"]), borrowed);

        // Đúng hạn trả: chưa quá hạn
        assert!(!loan.is_overdue(loan.due_at));
        // Qua hạn một giây
        assert!(loan.is_overdue(loan.due_at + Duration::seconds(1)));

        // Đã trả thì không bao giờ quá hạn nữa
        loan.returned_at = Some(loan.due_at + Duration::days(3));
        assert!(!loan.is_overdue(loan.due_at + Duration::days(10)));
    }

    #[test]
    fn test_outstanding_fine() {
        let borrowed = at(2024, 5, 1);
        let mut loan = Loan::new(1, isbns(&["1234567890"]), borrowed);

        assert_eq!(loan.outstanding_fine(loan.due_at), 0);
        assert_eq!(loan.outstanding_fine(loan.due_at + Duration::days(2)), 10_000);

        loan.returned_at = Some(loan.due_at + Duration::days(2));
        assert_eq!(loan.outstanding_fine(loan.due_at + Duration::days(30)), 0);
    }
}
