//! Library statistics - catalog, readers, circulation
//!
//! Các con số thống kê đều suy ra từ store, không lưu trạng thái
//! riêng; đổi dữ liệu thì tính lại từ đầu.

use crate::exporters::ReportData;
use biblio_circulation::CirculationLedger;
use biblio_core::{Catalog, Gender, Registry};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Thống kê danh mục sách
#[derive(Debug, Clone)]
pub struct CatalogStats {
    /// Số đầu sách
    pub total_titles: usize,
    /// Tổng số bản đang trong kho
    pub total_copies: u64,
    /// Tổng giá trị tồn kho (Σ giá × số bản)
    pub inventory_value: Decimal,
    /// Số đầu sách theo thể loại, theo thứ tự thể loại xuất hiện
    pub titles_per_category: Vec<(String, usize)>,
}

impl CatalogStats {
    pub fn compute(catalog: &Catalog) -> Self {
        let mut total_copies = 0u64;
        let mut inventory_value = Decimal::ZERO;
        let mut titles_per_category: Vec<(String, usize)> = Vec::new();

        for book in catalog.iter() {
            total_copies += u64::from(book.quantity);
            inventory_value += book.inventory_value();
            match titles_per_category
                .iter()
                .position(|(c, _)| c == &book.category)
            {
                Some(i) => titles_per_category[i].1 += 1,
                None => titles_per_category.push((book.category.clone(), 1)),
            }
        }

        Self {
            total_titles: catalog.len(),
            total_copies,
            inventory_value,
            titles_per_category,
        }
    }
}

/// Thống kê sổ độc giả
#[derive(Debug, Clone)]
pub struct ReaderStats {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    /// Số độc giả theo năm gia nhập, năm tăng dần
    pub per_membership_year: Vec<(i32, usize)>,
}

impl ReaderStats {
    pub fn compute(registry: &Registry) -> Self {
        let mut male = 0;
        let mut female = 0;
        let mut per_membership_year: Vec<(i32, usize)> = Vec::new();

        for reader in registry.iter() {
            match reader.gender {
                Gender::Male => male += 1,
                Gender::Female => female += 1,
            }
            match per_membership_year
                .iter()
                .position(|(y, _)| *y == reader.membership_year)
            {
                Some(i) => per_membership_year[i].1 += 1,
                None => per_membership_year.push((reader.membership_year, 1)),
            }
        }
        per_membership_year.sort_by_key(|(y, _)| *y);

        Self {
            total: registry.len(),
            male,
            female,
            per_membership_year,
        }
    }

    /// Tỷ lệ nam (%)
    pub fn male_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.male as f64 * 100.0 / self.total as f64
        }
    }

    /// Tỷ lệ nữ (%)
    pub fn female_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.female as f64 * 100.0 / self.total as f64
        }
    }
}

/// Thống kê lưu thông
#[derive(Debug, Clone)]
pub struct CirculationStats {
    /// Tổng số lượt mượn đã ghi, cả đã trả
    pub total_loans: usize,
    /// Lượt mượn còn mở
    pub active_loans: usize,
    /// Số sách đang nằm ngoài thư viện
    pub books_out: usize,
    /// Lượt quá hạn tại thời điểm thống kê
    pub overdue_loans: usize,
    /// Tổng phạt tạm tính của các lượt quá hạn (VND)
    pub outstanding_fines: i64,
}

impl CirculationStats {
    pub fn compute(ledger: &CirculationLedger, now: DateTime<Utc>) -> Self {
        let mut active_loans = 0;
        let mut books_out = 0;
        let mut overdue_loans = 0;
        let mut outstanding_fines = 0i64;

        for (_, loan) in ledger.iter() {
            if !loan.is_returned() {
                active_loans += 1;
                books_out += loan.book_count();
            }
            if loan.is_overdue(now) {
                overdue_loans += 1;
                outstanding_fines += loan.outstanding_fine(now);
            }
        }

        Self {
            total_loans: ledger.len(),
            active_loans,
            books_out,
            overdue_loans,
            outstanding_fines,
        }
    }

    /// Số sách trung bình mỗi lượt mượn còn mở
    pub fn avg_books_per_active_loan(&self) -> f64 {
        if self.active_loans == 0 {
            0.0
        } else {
            self.books_out as f64 / self.active_loans as f64
        }
    }

    /// Tỷ lệ quá hạn trên tổng số lượt mượn (%)
    pub fn overdue_share_pct(&self) -> f64 {
        if self.total_loans == 0 {
            0.0
        } else {
            self.overdue_loans as f64 * 100.0 / self.total_loans as f64
        }
    }
}

/// Báo cáo thống kê tổng hợp, export được qua [`ReportData`].
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub catalog: CatalogStats,
    pub readers: ReaderStats,
    pub circulation: CirculationStats,
    pub generated_at: DateTime<Utc>,
}

impl StatsReport {
    /// Tính cả ba nhóm thống kê tại thời điểm `now`
    pub fn build(
        catalog: &Catalog,
        registry: &Registry,
        ledger: &CirculationLedger,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            catalog: CatalogStats::compute(catalog),
            readers: ReaderStats::compute(registry),
            circulation: CirculationStats::compute(ledger, now),
            generated_at: now,
        }
    }
}

impl ReportData for StatsReport {
    fn title(&self) -> &str {
        "Library Statistics"
    }

    fn headers(&self) -> Vec<String> {
        vec!["Metric".to_string(), "Value".to_string()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![
            vec!["Titles".to_string(), self.catalog.total_titles.to_string()],
            vec![
                "Copies in stock".to_string(),
                self.catalog.total_copies.to_string(),
            ],
            vec![
                "Inventory value (VND)".to_string(),
                self.catalog.inventory_value.to_string(),
            ],
        ];
        for (category, count) in &self.catalog.titles_per_category {
            rows.push(vec![format!("Titles in {}", category), count.to_string()]);
        }

        rows.push(vec![
            "Readers".to_string(),
            self.readers.total.to_string(),
        ]);
        rows.push(vec![
            "Male readers".to_string(),
            format!("{} ({:.1}%)", self.readers.male, self.readers.male_pct()),
        ]);
        rows.push(vec![
            "Female readers".to_string(),
            format!("{} ({:.1}%)", self.readers.female, self.readers.female_pct()),
        ]);
        for (year, count) in &self.readers.per_membership_year {
            rows.push(vec![format!("Members joined {}", year), count.to_string()]);
        }

        rows.push(vec![
            "Loans recorded".to_string(),
            self.circulation.total_loans.to_string(),
        ]);
        rows.push(vec![
            "Active loans".to_string(),
            self.circulation.active_loans.to_string(),
        ]);
        rows.push(vec![
            "Books currently out".to_string(),
            self.circulation.books_out.to_string(),
        ]);
        rows.push(vec![
            "Avg books per active loan".to_string(),
            format!("{:.2}", self.circulation.avg_books_per_active_loan()),
        ]);
        rows.push(vec![
            "Overdue loans".to_string(),
            format!(
                "{} ({:.1}%)",
                self.circulation.overdue_loans,
                self.circulation.overdue_share_pct()
            ),
        ]);
        rows.push(vec![
            "Outstanding fines (VND)".to_string(),
            self.circulation.outstanding_fines.to_string(),
        ]);
        rows
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            (
                "Titles".to_string(),
                self.catalog.total_titles.to_string(),
            ),
            ("Readers".to_string(), self.readers.total.to_string()),
            (
                "Loans".to_string(),
                self.circulation.total_loans.to_string(),
            ),
            ("Generated At".to_string(), self.generated_at.to_rfc3339()),
        ]
    }
}
