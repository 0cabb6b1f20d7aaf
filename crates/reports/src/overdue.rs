//! Overdue report - loans past their due date
//!
//! One row per overdue loan, joined with the registry for reader
//! names. Fines here are live estimates; the final fine is settled
//! when the loan is actually returned.

use crate::exporters::ReportData;
use biblio_circulation::CirculationLedger;
use biblio_core::{Isbn, LoanId, Registry};
use chrono::{DateTime, Utc};

/// One overdue loan
#[derive(Debug, Clone)]
pub struct OverdueRow {
    pub loan_id: LoanId,
    pub reader_id: u32,
    pub reader_name: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// Số ngày trễ trọn vẹn tính đến thời điểm lập báo cáo
    pub days_late: i64,
    /// Tiền phạt tạm tính (VND)
    pub fine: i64,
    pub isbns: Vec<Isbn>,
}

/// Báo cáo các lượt mượn quá hạn tại một thời điểm.
#[derive(Debug, Clone)]
pub struct OverdueReport {
    pub rows: Vec<OverdueRow>,
    /// Tổng số lượt mượn trong sổ cái (mẫu số cho tỷ lệ quá hạn)
    pub total_loans: usize,
    pub generated_at: DateTime<Utc>,
}

impl OverdueReport {
    /// Lập báo cáo từ sổ cái và sổ độc giả tại thời điểm `now`
    pub fn build(registry: &Registry, ledger: &CirculationLedger, now: DateTime<Utc>) -> Self {
        let mut rows = Vec::new();
        for (loan_id, loan) in ledger.overdue(now) {
            // Độc giả có thể đã bị xóa sau khi mượn
            let reader_name = registry
                .find_by_id(loan.reader_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "(unknown)".to_string());
            rows.push(OverdueRow {
                loan_id,
                reader_id: loan.reader_id,
                reader_name,
                borrowed_at: loan.borrowed_at,
                due_at: loan.due_at,
                days_late: (now - loan.due_at).num_days(),
                fine: loan.outstanding_fine(now),
                isbns: loan.isbns.clone(),
            });
        }
        Self {
            rows,
            total_loans: ledger.len(),
            generated_at: now,
        }
    }

    /// Số lượt quá hạn
    pub fn overdue_count(&self) -> usize {
        self.rows.len()
    }

    /// Tỷ lệ quá hạn trên tổng số lượt mượn (%)
    pub fn overdue_share_pct(&self) -> f64 {
        if self.total_loans == 0 {
            0.0
        } else {
            self.rows.len() as f64 * 100.0 / self.total_loans as f64
        }
    }

    /// Tổng tiền phạt tạm tính (VND)
    pub fn total_fine(&self) -> i64 {
        self.rows.iter().map(|r| r.fine).sum()
    }

    /// Tiền phạt trung bình mỗi lượt quá hạn (VND)
    pub fn average_fine(&self) -> f64 {
        if self.rows.is_empty() {
            0.0
        } else {
            self.total_fine() as f64 / self.rows.len() as f64
        }
    }
}

impl ReportData for OverdueReport {
    fn title(&self) -> &str {
        "Overdue Loans"
    }

    fn headers(&self) -> Vec<String> {
        vec![
            "Loan".to_string(),
            "Reader ID".to_string(),
            "Reader Name".to_string(),
            "Borrowed".to_string(),
            "Due".to_string(),
            "Days Late".to_string(),
            "Fine (VND)".to_string(),
            "ISBNs".to_string(),
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.loan_id.to_string(),
                    r.reader_id.to_string(),
                    r.reader_name.clone(),
                    r.borrowed_at.format("%Y-%m-%d").to_string(),
                    r.due_at.format("%Y-%m-%d").to_string(),
                    r.days_late.to_string(),
                    r.fine.to_string(),
                    r.isbns
                        .iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Total Loans".to_string(), self.total_loans.to_string()),
            ("Overdue Loans".to_string(), self.overdue_count().to_string()),
            (
                "Overdue Share".to_string(),
                format!("{:.1}%", self.overdue_share_pct()),
            ),
            (
                "Total Outstanding Fine".to_string(),
                format!("{} VND", self.total_fine()),
            ),
            (
                "Average Fine".to_string(),
                format!("{:.0} VND", self.average_fine()),
            ),
            ("Generated At".to_string(), self.generated_at.to_rfc3339()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_core::{Gender, Loan, Registration};
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn isbn(s: &str) -> Isbn {
        s.parse().unwrap()
    }

    fn fixture() -> (Registry, CirculationLedger, DateTime<Utc>) {
        let start = at(2024, 5, 1);
        let mut registry = Registry::new();
        registry
            .register(
                Registration {
                    name: "Nguyen Van An".to_string(),
                    national_id: "012345678901".to_string(),
                    birth_date: "1995-04-12".parse().unwrap(),
                    gender: Gender::Male,
                    email: "an@example.com".to_string(),
                    phone: "0901234567".to_string(),
                    address: "Ha Noi".to_string(),
                },
                start,
            )
            .unwrap();

        let mut ledger = CirculationLedger::new();
        // Loan 0: quá hạn 2 ngày 5 tiếng
        ledger
            .insert(Loan::new(1, vec![isbn("1111111111"), isbn("2222222222")], start))
            .unwrap();
        // Loan 1: còn trong hạn
        ledger
            .insert(Loan::new(1, vec![isbn("3333333333")], start + Duration::days(5)))
            .unwrap();
        // Loan 2: đã trả trễ, không còn tính quá hạn
        let mut returned = Loan::new(1, vec![isbn("4444444444")], start);
        returned.returned_at = Some(start + Duration::days(10));
        ledger.insert(returned).unwrap();

        // start + 7 (hạn loan 0) + 2 ngày 5 tiếng
        let now = start + Duration::days(9) + Duration::hours(5);
        (registry, ledger, now)
    }

    #[test]
    fn test_report_rows_hand_computed() {
        let (registry, ledger, now) = fixture();
        let report = OverdueReport::build(&registry, &ledger, now);

        assert_eq!(report.total_loans, 3);
        assert_eq!(report.overdue_count(), 1);

        let row = &report.rows[0];
        assert_eq!(row.loan_id, 0);
        assert_eq!(row.reader_name, "Nguyen Van An");
        assert_eq!(row.days_late, 2);
        assert_eq!(row.fine, 10_000);
        assert_eq!(row.isbns.len(), 2);

        assert_eq!(report.total_fine(), 10_000);
        assert!((report.overdue_share_pct() - 33.333).abs() < 0.01);
        assert!((report.average_fine() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_removed_reader_shows_placeholder() {
        let (mut registry, ledger, now) = fixture();
        registry.remove(1).unwrap();

        let report = OverdueReport::build(&registry, &ledger, now);
        assert_eq!(report.rows[0].reader_name, "(unknown)");
    }

    #[test]
    fn test_empty_ledger() {
        let registry = Registry::new();
        let ledger = CirculationLedger::new();
        let report = OverdueReport::build(&registry, &ledger, at(2024, 5, 1));

        assert_eq!(report.overdue_count(), 0);
        assert_eq!(report.overdue_share_pct(), 0.0);
        assert_eq!(report.average_fine(), 0.0);
    }

    #[test]
    fn test_report_data_rendering() {
        let (registry, ledger, now) = fixture();
        let report = OverdueReport::build(&registry, &ledger, now);

        let rows = ReportData::rows(&report);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "0");
        assert_eq!(rows[0][5], "2");
        assert_eq!(rows[0][7], "1111111111 2222222222");

        let summary = report.summary();
        assert!(summary.contains(&("Overdue Loans".to_string(), "1".to_string())));
        assert!(summary.contains(&("Overdue Share".to_string(), "33.3%".to_string())));
    }
}
