//! # Ledger Module
//!
//! CirculationLedger - sổ cái các lượt mượn. Loans chỉ được thêm,
//! không bao giờ xóa, nên index trong sổ chính là LoanId ổn định.

use biblio_core::{
    late_fine, Catalog, CoreError, CoreResult, Isbn, Loan, LoanId, Registry, MAX_BOOKS_PER_LOAN,
};
use chrono::{DateTime, Utc};

/// Sức chứa tối đa của sổ cái
pub const MAX_LOANS: usize = 1000;

/// Sổ cái lưu thông.
///
/// Mọi thay đổi tồn kho sách khi mượn/trả đi qua đây; Catalog và
/// Registry do caller sở hữu và truyền vào từng operation.
#[derive(Debug)]
pub struct CirculationLedger {
    loans: Vec<Loan>,
    capacity: usize,
}

impl CirculationLedger {
    /// Tạo sổ cái với sức chứa mặc định
    pub fn new() -> Self {
        Self::bounded(MAX_LOANS)
    }

    /// Tạo sổ cái với sức chứa cho trước (dùng trong tests)
    pub fn bounded(capacity: usize) -> Self {
        Self {
            loans: Vec::new(),
            capacity,
        }
    }

    /// Tạo lượt mượn mới tại thời điểm `now`.
    ///
    /// Thứ tự kiểm tra cố định, lỗi đầu tiên dừng operation:
    /// 1. Sổ cái còn chỗ
    /// 2. Độc giả tồn tại
    /// 3. Thẻ còn hạn
    /// 4. Số sách trong khoảng 1..=5
    /// 5. Từng ISBN theo thứ tự đưa vào: tồn tại và còn bản cho mượn
    ///
    /// Tồn kho bị trừ NGAY khi từng ISBN qua được bước 5. Gặp lỗi giữa
    /// chừng thì các ISBN đứng trước vẫn đã bị trừ và không được hoàn
    /// lại; đây là hành vi kế thừa được giữ nguyên, xem ghi chú ở
    /// DESIGN.md. Caller muốn an toàn thì kiểm tra tồn kho trước.
    pub fn create_loan(
        &mut self,
        registry: &Registry,
        catalog: &mut Catalog,
        reader_id: u32,
        isbns: Vec<Isbn>,
        now: DateTime<Utc>,
    ) -> CoreResult<LoanId> {
        // Sổ cái còn chỗ không
        if self.loans.len() >= self.capacity {
            return Err(CoreError::CapacityExceeded(self.capacity));
        }

        // Độc giả tồn tại và thẻ còn hạn
        let reader = registry
            .find_by_id(reader_id)
            .ok_or(CoreError::ReaderNotFound(reader_id))?;
        if !reader.card_valid_at(now) {
            return Err(CoreError::CardExpired {
                reader_id,
                expired_at: reader.card_expires_at(),
            });
        }

        // Số sách hợp lệ
        if isbns.is_empty() || isbns.len() > MAX_BOOKS_PER_LOAN {
            return Err(CoreError::InvalidBookCount(isbns.len()));
        }

        // Trừ tồn kho từng cuốn theo thứ tự đưa vào
        for isbn in &isbns {
            let book = catalog
                .find_by_isbn_mut(isbn)
                .ok_or_else(|| CoreError::BookNotFound(isbn.to_string()))?;
            if !book.is_available() {
                return Err(CoreError::BookUnavailable(isbn.to_string()));
            }
            book.quantity -= 1;
        }

        let loan = Loan::new(reader_id, isbns, now);
        let loan_id = self.loans.len();
        tracing::info!(
            "Loan #{} created: reader #{}, {} book(s), due {}",
            loan_id,
            reader_id,
            loan.book_count(),
            loan.due_at.format("%Y-%m-%d")
        );
        self.loans.push(loan);
        Ok(loan_id)
    }

    /// Ghi nhận trả sách tại thời điểm `now`, trả về tiền phạt (VND).
    ///
    /// Thứ tự kiểm tra: loan_id hợp lệ, đúng chủ lượt mượn, lượt chưa
    /// đóng. Sau đó chốt thời điểm trả, tính phạt trễ hạn và hoàn tồn
    /// kho từng ISBN; sách đã bị xóa khỏi catalog trong lúc mượn thì
    /// bỏ qua khi hoàn.
    pub fn return_loan(
        &mut self,
        catalog: &mut Catalog,
        reader_id: u32,
        loan_id: LoanId,
        now: DateTime<Utc>,
    ) -> CoreResult<i64> {
        let loan = self
            .loans
            .get_mut(loan_id)
            .ok_or(CoreError::InvalidIndex(loan_id))?;
        if loan.reader_id != reader_id {
            return Err(CoreError::OwnershipMismatch { loan_id, reader_id });
        }
        if loan.is_returned() {
            return Err(CoreError::AlreadyReturned(loan_id));
        }

        loan.returned_at = Some(now);
        let fine = late_fine(loan.due_at, now);

        // Hoàn tồn kho
        for isbn in &loan.isbns {
            match catalog.find_by_isbn_mut(isbn) {
                Some(book) => book.quantity += 1,
                None => {
                    tracing::warn!("Book {} no longer in catalog, restock skipped", isbn);
                }
            }
        }

        tracing::info!(
            "Loan #{} returned: reader #{}, fine {} VND",
            loan_id,
            reader_id,
            fine
        );
        Ok(fine)
    }

    /// Nạp lại một Loan đã có từ file (giữ nguyên thứ tự để LoanId khớp)
    pub fn insert(&mut self, loan: Loan) -> CoreResult<LoanId> {
        if self.loans.len() >= self.capacity {
            return Err(CoreError::CapacityExceeded(self.capacity));
        }
        let loan_id = self.loans.len();
        self.loans.push(loan);
        Ok(loan_id)
    }

    /// Lấy lượt mượn theo id
    pub fn get(&self, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(loan_id)
    }

    /// Iterator qua toàn bộ lượt mượn kèm id
    pub fn iter(&self) -> impl Iterator<Item = (LoanId, &Loan)> {
        self.loans.iter().enumerate()
    }

    /// Các lượt mượn của một độc giả
    pub fn loans_for_reader(&self, reader_id: u32) -> Vec<(LoanId, &Loan)> {
        self.iter().filter(|(_, l)| l.reader_id == reader_id).collect()
    }

    /// Các lượt mượn còn mở
    pub fn unreturned(&self) -> Vec<(LoanId, &Loan)> {
        self.iter().filter(|(_, l)| !l.is_returned()).collect()
    }

    /// Các lượt mượn quá hạn tại thời điểm `now`
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<(LoanId, &Loan)> {
        self.iter().filter(|(_, l)| l.is_overdue(now)).collect()
    }

    /// Tổng số lượt mượn đã ghi (cả đã trả)
    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Sức chứa tối đa
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CirculationLedger {
    fn default() -> Self {
        Self::new()
    }
}
