//! Statistics, overdue report and export commands

use anyhow::{bail, Context, Result};
use biblio_core::{Book, Loan, Reader};
use biblio_persistence::{Library, LibraryStore};
use biblio_reports::{
    CsvExporter, JsonExporter, MarkdownExporter, OverdueReport, ReportData, ReportExporter,
    StatsReport,
};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::truncate;
use crate::{ReportFormat, ReportKind};

/// Show overdue loans with estimated fines
pub fn show_overdue(store: &LibraryStore) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;
    let report = OverdueReport::build(&library.registry, &library.ledger, Utc::now());

    if report.rows.is_empty() {
        println!("No overdue loans.");
        return Ok(());
    }

    println!("🔔 Overdue Loans");
    println!(
        "{:<6} {:<8} {:<24} {:<12} {:>9} {:>12}",
        "LOAN", "READER", "NAME", "DUE", "DAYS LATE", "FINE"
    );
    println!("{}", "-".repeat(78));
    for row in &report.rows {
        println!(
            "{:<6} {:<8} {:<24} {:<12} {:>9} {:>12}",
            row.loan_id,
            row.reader_id,
            truncate(&row.reader_name, 24),
            row.due_at.format("%Y-%m-%d").to_string(),
            row.days_late,
            row.fine
        );
    }
    println!("{}", "-".repeat(78));
    println!(
        "{} of {} loans overdue ({:.1}%), total outstanding fine: {} VND",
        report.overdue_count(),
        report.total_loans,
        report.overdue_share_pct(),
        report.total_fine()
    );

    Ok(())
}

/// Show library statistics
pub fn show_stats(store: &LibraryStore) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;
    let report = StatsReport::build(&library.catalog, &library.registry, &library.ledger, Utc::now());

    println!("📊 Library Statistics");
    println!();
    println!("Catalog:");
    println!("   Titles:           {}", report.catalog.total_titles);
    println!("   Copies on shelf:  {}", report.catalog.total_copies);
    println!("   Inventory value:  {} VND", report.catalog.inventory_value);
    for (category, count) in &report.catalog.titles_per_category {
        println!("   - {}: {}", category, count);
    }
    println!();
    println!("Readers:");
    println!("   Total:   {}", report.readers.total);
    println!(
        "   Male:    {} ({:.1}%)",
        report.readers.male,
        report.readers.male_pct()
    );
    println!(
        "   Female:  {} ({:.1}%)",
        report.readers.female,
        report.readers.female_pct()
    );
    for (year, count) in &report.readers.per_membership_year {
        println!("   - joined {}: {}", year, count);
    }
    println!();
    println!("Circulation:");
    println!("   Total loans:        {}", report.circulation.total_loans);
    println!("   Active loans:       {}", report.circulation.active_loans);
    println!("   Books out:          {}", report.circulation.books_out);
    println!(
        "   Overdue loans:      {} ({:.1}%)",
        report.circulation.overdue_loans,
        report.circulation.overdue_share_pct()
    );
    println!(
        "   Outstanding fines:  {} VND",
        report.circulation.outstanding_fines
    );

    Ok(())
}

/// Export a report to the requested format
pub fn export(
    store: &LibraryStore,
    report: ReportKind,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;
    let now = Utc::now();

    let content = match report {
        ReportKind::Overdue => {
            let report = OverdueReport::build(&library.registry, &library.ledger, now);
            export_report(&report, format)
        }
        ReportKind::Stats => {
            let report = StatsReport::build(&library.catalog, &library.registry, &library.ledger, now);
            export_report(&report, format)
        }
        ReportKind::Snapshot => {
            if !matches!(format, ReportFormat::Json) {
                bail!("Snapshot export only supports the json format");
            }
            snapshot_json(&library)?
        }
    };

    match output {
        Some(path) => {
            fs::write(&path, &content).context("Failed to write report file")?;
            println!("✅ Report generated: {:?}", path);
        }
        None => {
            println!("{}", content);
        }
    }

    Ok(())
}

/// Export report to specified format
fn export_report(report: &dyn ReportData, format: ReportFormat) -> String {
    match format {
        ReportFormat::Csv => CsvExporter::new().export(report),
        ReportFormat::Json => JsonExporter::new().export(report),
        ReportFormat::Markdown => MarkdownExporter::new().export(report),
    }
}

/// Full library state as one JSON document
#[derive(Serialize)]
struct Snapshot<'a> {
    books: Vec<&'a Book>,
    readers: Vec<&'a Reader>,
    loans: Vec<&'a Loan>,
}

fn snapshot_json(library: &Library) -> Result<String> {
    let snapshot = Snapshot {
        books: library.catalog.iter().collect(),
        readers: library.registry.iter().collect(),
        loans: library.ledger.iter().map(|(_, loan)| loan).collect(),
    };
    serde_json::to_string_pretty(&snapshot).context("Failed to serialize library snapshot")
}
