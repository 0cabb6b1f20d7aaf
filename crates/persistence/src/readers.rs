//! # Readers File
//!
//! Sổ độc giả dạng text: dòng đầu là số độc giả, mỗi record 10 dòng
//! theo thứ tự id, name, national_id, birth_date (ISO), gender,
//! email, phone, address, card_issued_at (epoch seconds),
//! membership_year.

use crate::error::{PersistenceError, PersistenceResult};
use crate::record::LineReader;
use biblio_core::{Gender, Reader, Registry};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ghi toàn bộ sổ độc giả ra file
pub fn save_readers(path: &Path, registry: &Registry) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", registry.len())?;
    for reader in registry.iter() {
        writeln!(writer, "{}", reader.id)?;
        writeln!(writer, "{}", reader.name)?;
        writeln!(writer, "{}", reader.national_id)?;
        writeln!(writer, "{}", reader.birth_date)?;
        writeln!(writer, "{}", reader.gender)?;
        writeln!(writer, "{}", reader.email)?;
        writeln!(writer, "{}", reader.phone)?;
        writeln!(writer, "{}", reader.address)?;
        writeln!(writer, "{}", reader.card_issued_at.timestamp())?;
        writeln!(writer, "{}", reader.membership_year)?;
    }
    writer.flush()?;
    Ok(())
}

/// Đọc sổ độc giả từ file; file chưa tồn tại cho sổ rỗng.
///
/// Registry::insert đẩy bộ đếm id lên theo id lớn nhất đã nạp, nên
/// độc giả đăng ký sau khi load không bao giờ trùng id cũ.
pub fn load_readers(path: &Path) -> PersistenceResult<Registry> {
    let mut registry = Registry::new();
    if !path.exists() {
        return Ok(registry);
    }

    let file = File::open(path)?;
    let file_name = path.display().to_string();
    let mut lr = LineReader::new(BufReader::new(file), &file_name);

    let count: usize = lr.parse("record count")?;
    for _ in 0..count {
        let id: u32 = lr.parse("reader id")?;
        let name = lr.next_line()?;
        let national_id = lr.next_line()?;
        let birth_date: NaiveDate = lr.parse("birth date")?;
        let raw_gender = lr.next_line()?;
        let gender = Gender::from_str(&raw_gender).ok_or_else(|| {
            PersistenceError::malformed(
                lr.file(),
                lr.line(),
                format!("invalid gender: {}", raw_gender),
            )
        })?;
        let email = lr.next_line()?;
        let phone = lr.next_line()?;
        let address = lr.next_line()?;
        let card_issued_at = lr.epoch("card issue timestamp")?;
        let membership_year: i32 = lr.parse("membership year")?;

        registry.insert(Reader {
            id,
            name,
            national_id,
            birth_date,
            gender,
            email,
            phone,
            address,
            card_issued_at,
            membership_year,
        })?;
    }
    Ok(registry)
}
