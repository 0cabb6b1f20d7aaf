//! # Loans File
//!
//! Sổ cái lưu thông dạng text. Thứ tự field của từng record là
//! contract với tool bên ngoài, không được đổi:
//!
//! ```text
//! reader_id
//! borrowed_at   (epoch seconds)
//! due_at        (epoch seconds)
//! returned_at   (epoch seconds, 0 khi chưa trả)
//! book_count
//! isbn          (lặp book_count lần, đúng thứ tự mượn)
//! returned      (0 | 1)
//! ```
//!
//! Dòng đầu file là số record. Thứ tự record trong file là LoanId,
//! nên load phải giữ nguyên thứ tự ghi.

use crate::error::{PersistenceError, PersistenceResult};
use crate::record::LineReader;
use biblio_circulation::CirculationLedger;
use biblio_core::{Isbn, Loan, MAX_BOOKS_PER_LOAN};
use chrono::DateTime;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ghi toàn bộ sổ cái ra file
pub fn save_loans(path: &Path, ledger: &CirculationLedger) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", ledger.len())?;
    for (_, loan) in ledger.iter() {
        writeln!(writer, "{}", loan.reader_id)?;
        writeln!(writer, "{}", loan.borrowed_at.timestamp())?;
        writeln!(writer, "{}", loan.due_at.timestamp())?;
        writeln!(
            writer,
            "{}",
            loan.returned_at.map(|t| t.timestamp()).unwrap_or(0)
        )?;
        writeln!(writer, "{}", loan.book_count())?;
        for isbn in &loan.isbns {
            writeln!(writer, "{}", isbn)?;
        }
        writeln!(writer, "{}", if loan.is_returned() { 1 } else { 0 })?;
    }
    writer.flush()?;
    Ok(())
}

/// Đọc sổ cái từ file; file chưa tồn tại cho sổ rỗng.
///
/// Hạn trả đọc nguyên từ file, không tính lại từ ngày mượn; record
/// ghi dưới chính sách cũ giữ nguyên hạn cũ. Số sách mỗi record phải
/// nằm trong 1..=MAX_BOOKS_PER_LOAN, ngoài khoảng coi là file hỏng.
pub fn load_loans(path: &Path) -> PersistenceResult<CirculationLedger> {
    let mut ledger = CirculationLedger::new();
    if !path.exists() {
        return Ok(ledger);
    }

    let file = File::open(path)?;
    let file_name = path.display().to_string();
    let mut lr = LineReader::new(BufReader::new(file), &file_name);

    let count: usize = lr.parse("record count")?;
    for _ in 0..count {
        let reader_id: u32 = lr.parse("reader id")?;
        let borrowed_at = lr.epoch("borrow timestamp")?;
        let due_at = lr.epoch("due timestamp")?;
        let returned_secs: i64 = lr.parse("return timestamp")?;
        let book_count: usize = lr.parse("book count")?;
        if !(1..=MAX_BOOKS_PER_LOAN).contains(&book_count) {
            return Err(PersistenceError::malformed(
                lr.file(),
                lr.line(),
                format!("book count out of range: {}", book_count),
            ));
        }
        let mut isbns = Vec::with_capacity(book_count);
        for _ in 0..book_count {
            isbns.push(lr.parse::<Isbn>("isbn")?);
        }
        let returned = match lr.next_line()?.as_str() {
            "0" => false,
            "1" => true,
            other => {
                return Err(PersistenceError::malformed(
                    lr.file(),
                    lr.line(),
                    format!("invalid returned flag: {}", other),
                ))
            }
        };

        // Flag quyết định trạng thái; timestamp 0 chỉ là sentinel
        let returned_at = if returned {
            Some(DateTime::from_timestamp(returned_secs, 0).ok_or_else(|| {
                PersistenceError::malformed(
                    lr.file(),
                    lr.line(),
                    format!("invalid return timestamp: {}", returned_secs),
                )
            })?)
        } else {
            None
        };

        ledger.insert(Loan {
            reader_id,
            borrowed_at,
            due_at,
            returned_at,
            isbns,
        })?;
    }
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn isbn(s: &str) -> Isbn {
        s.parse().unwrap()
    }

    fn sample_ledger() -> CirculationLedger {
        let mut ledger = CirculationLedger::new();
        let borrowed = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        // Lượt còn mở, hai cuốn
        ledger
            .insert(Loan::new(
                1,
                vec![isbn("1111111111"), isbn("2222222222")],
                borrowed,
            ))
            .unwrap();

        // Lượt đã trả trễ
        let mut returned = Loan::new(2, vec![isbn("3333333333")], borrowed);
        returned.returned_at = Some(borrowed + Duration::days(9));
        ledger.insert(returned).unwrap();

        ledger
    }

    #[test]
    fn test_roundtrip_preserves_ids_and_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.dat");
        let original = sample_ledger();

        save_loans(&path, &original).unwrap();
        let loaded = load_loans(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        for (id, loan) in original.iter() {
            let reloaded = loaded.get(id).unwrap();
            assert_eq!(reloaded.reader_id, loan.reader_id);
            assert_eq!(reloaded.borrowed_at, loan.borrowed_at);
            assert_eq!(reloaded.due_at, loan.due_at);
            assert_eq!(reloaded.returned_at, loan.returned_at);
            assert_eq!(reloaded.isbns, loan.isbns);
        }
    }

    #[test]
    fn test_file_layout_matches_contract() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.dat");
        let mut ledger = CirculationLedger::new();
        let borrowed = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        ledger
            .insert(Loan::new(7, vec![isbn("1234567890")], borrowed))
            .unwrap();

        save_loans(&path, &ledger).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let due = borrowed + Duration::days(7);
        let expected = format!(
            "1\n7\n{}\n{}\n0\n1\n1234567890\n0\n",
            borrowed.timestamp(),
            due.timestamp()
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn test_missing_file_gives_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let ledger = load_loans(&dir.path().join("loans.dat")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_invalid_returned_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.dat");
        std::fs::write(
            &path,
            "1\n1\n1714557600\n1715162400\n0\n1\n1234567890\nyes\n",
        )
        .unwrap();

        let err = load_loans(&path).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("invalid returned flag: yes"));
    }

    #[test]
    fn test_book_count_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.dat");

        // Record đủ cấu trúc nhưng khai 6 cuốn, quá giới hạn một lượt mượn
        let isbns = [
            "1111111111",
            "2222222222",
            "3333333333",
            "4444444444",
            "5555555555",
            "6666666666",
        ]
        .join("\n");
        std::fs::write(
            &path,
            format!("1\n1\n1714557600\n1715162400\n0\n6\n{}\n0\n", isbns),
        )
        .unwrap();

        let err = load_loans(&path).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("book count out of range: 6"));

        // Khai 0 cuốn cũng bị từ chối
        std::fs::write(&path, "1\n1\n1714557600\n1715162400\n0\n0\n0\n").unwrap();
        let err = load_loans(&path).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("book count out of range: 0"));
    }

    #[test]
    fn test_huge_book_count_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.dat");
        // Count sát usize::MAX phải bị chặn trước khi cấp phát vec ISBN
        std::fs::write(
            &path,
            "1\n1\n1714557600\n1715162400\n0\n18446744073709551615\n",
        )
        .unwrap();

        let err = load_loans(&path).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("book count"));
    }

    #[test]
    fn test_unreturned_flag_wins_over_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.dat");
        // Timestamp trả khác 0 nhưng flag 0: lượt vẫn tính là còn mở
        std::fs::write(
            &path,
            "1\n1\n1714557600\n1715162400\n1715200000\n1\n1234567890\n0\n",
        )
        .unwrap();

        let loaded = load_loans(&path).unwrap();
        assert!(!loaded.get(0).unwrap().is_returned());
    }
}
