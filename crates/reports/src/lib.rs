//! # Biblio Reports
//!
//! Report generation - overdue report, library statistics and
//! CSV/JSON/Markdown exporters.
//!
//! Reports are pure derivations over the stores; building one never
//! mutates catalog, registry or ledger.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV format with proper escaping
//! - [`JsonExporter`] - JSON format (pretty or compact)
//! - [`MarkdownExporter`] - Markdown tables for documentation
//!
//! ## Reports
//!
//! - [`OverdueReport`] - one row per overdue loan, with live fines
//! - [`StatsReport`] - catalog / reader / circulation statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use biblio_reports::{CsvExporter, OverdueReport, ReportExporter};
//!
//! let report = OverdueReport::build(&registry, &ledger, Utc::now());
//! let csv = CsvExporter::new().export(&report);
//! ```

pub mod exporters;
pub mod overdue;
pub mod stats;

// Re-export main types
pub use exporters::{CsvExporter, JsonExporter, MarkdownExporter, ReportData, ReportExporter};
pub use overdue::{OverdueReport, OverdueRow};
pub use stats::{CatalogStats, CirculationStats, ReaderStats, StatsReport};
