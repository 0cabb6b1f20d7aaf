//! # Books File
//!
//! Danh mục sách dạng text: dòng đầu là số đầu sách, mỗi record 8
//! dòng theo thứ tự isbn, title, author, publisher, year, category,
//! price, quantity.

use crate::error::PersistenceResult;
use crate::record::LineReader;
use biblio_core::{Book, Catalog, Isbn};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ghi toàn bộ catalog ra file
pub fn save_books(path: &Path, catalog: &Catalog) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", catalog.len())?;
    for book in catalog.iter() {
        writeln!(writer, "{}", book.isbn)?;
        writeln!(writer, "{}", book.title)?;
        writeln!(writer, "{}", book.author)?;
        writeln!(writer, "{}", book.publisher)?;
        writeln!(writer, "{}", book.year)?;
        writeln!(writer, "{}", book.category)?;
        writeln!(writer, "{}", book.price)?;
        writeln!(writer, "{}", book.quantity)?;
    }
    writer.flush()?;
    Ok(())
}

/// Đọc catalog từ file; file chưa tồn tại cho catalog rỗng
pub fn load_books(path: &Path) -> PersistenceResult<Catalog> {
    let mut catalog = Catalog::new();
    if !path.exists() {
        return Ok(catalog);
    }

    let file = File::open(path)?;
    let file_name = path.display().to_string();
    let mut lr = LineReader::new(BufReader::new(file), &file_name);

    let count: usize = lr.parse("record count")?;
    for _ in 0..count {
        let isbn: Isbn = lr.parse("isbn")?;
        let title = lr.next_line()?;
        let author = lr.next_line()?;
        let publisher = lr.next_line()?;
        let year: i32 = lr.parse("year")?;
        let category = lr.next_line()?;
        let price: Decimal = lr.parse("price")?;
        let quantity: u32 = lr.parse("quantity")?;

        catalog.add(Book {
            isbn,
            title,
            author,
            publisher,
            year,
            category,
            price,
            quantity,
        })?;
    }
    Ok(catalog)
}
