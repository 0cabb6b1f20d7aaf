//! Borrow and return commands

use anyhow::{Context, Result};
use biblio_core::Isbn;
use biblio_persistence::LibraryStore;
use chrono::Utc;

use super::truncate;

/// Borrow books for a reader.
///
/// The loan is only persisted when every requested ISBN could be
/// borrowed; a failed request leaves the data files untouched.
pub fn borrow(store: &LibraryStore, reader_id: u32, isbns: &[String]) -> Result<()> {
    let isbns = isbns
        .iter()
        .map(|s| s.parse::<Isbn>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut library = store.load().context("Failed to load library data")?;

    let loan_id = library.ledger.create_loan(
        &library.registry,
        &mut library.catalog,
        reader_id,
        isbns,
        Utc::now(),
    )?;
    store.save(&library).context("Failed to save library data")?;

    println!("✅ Loan #{} created for reader #{}", loan_id, reader_id);
    if let Some(loan) = library.ledger.get(loan_id) {
        println!("   Books:    {}", loan.book_count());
        println!("   Due date: {}", loan.due_at.format("%Y-%m-%d"));
    }

    Ok(())
}

/// Return a loan and settle the late fine
pub fn return_loan(store: &LibraryStore, reader_id: u32, loan_id: usize) -> Result<()> {
    let mut library = store.load().context("Failed to load library data")?;

    let fine = library
        .ledger
        .return_loan(&mut library.catalog, reader_id, loan_id, Utc::now())?;
    store.save(&library).context("Failed to save library data")?;

    println!("✅ Loan #{} returned", loan_id);
    if fine > 0 {
        println!("   Late fine: {} VND", fine);
    } else {
        println!("   Returned on time, no fine.");
    }

    Ok(())
}

/// List loans, optionally filtered by reader id or reader name
pub fn list_loans(store: &LibraryStore, reader: Option<u32>, name: Option<&str>) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;
    let now = Utc::now();
    let name_filter = name.map(|n| n.to_lowercase());

    let mut rows = Vec::new();
    for (loan_id, loan) in library.ledger.iter() {
        if let Some(id) = reader {
            if loan.reader_id != id {
                continue;
            }
        }

        let reader_name = library
            .registry
            .find_by_id(loan.reader_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| "(unknown)".to_string());
        if let Some(term) = &name_filter {
            if !reader_name.to_lowercase().contains(term) {
                continue;
            }
        }

        let status = if loan.is_returned() {
            "returned"
        } else if loan.is_overdue(now) {
            "overdue"
        } else {
            "open"
        };
        rows.push((loan_id, loan, reader_name, status));
    }

    if rows.is_empty() {
        println!("No loans found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<8} {:<24} {:<12} {:<12} {:>5} {:<10}",
        "LOAN", "READER", "NAME", "BORROWED", "DUE", "BOOKS", "STATUS"
    );
    println!("{}", "-".repeat(85));
    for (loan_id, loan, reader_name, status) in rows {
        println!(
            "{:<6} {:<8} {:<24} {:<12} {:<12} {:>5} {:<10}",
            loan_id,
            loan.reader_id,
            truncate(&reader_name, 24),
            loan.borrowed_at.format("%Y-%m-%d").to_string(),
            loan.due_at.format("%Y-%m-%d").to_string(),
            loan.book_count(),
            status
        );
    }

    Ok(())
}
