//! Biblio CLI - Library operations from command line
//!
//! Usage:
//! ```bash
//! biblio book add 1234567890 "Dat rung phuong Nam" --author "Doan Gioi" \
//!     --publisher "NXB Kim Dong" --year 1957 --category Fiction --price 45000 --quantity 3
//! biblio reader add "Nguyen Van An" --national-id 012345678901 \
//!     --birth-date 1995-04-12 --gender male --phone 0901234567
//! biblio borrow 1 1234567890 0987654321
//! biblio return 1 0
//! biblio loans --reader 1
//! biblio overdue
//! biblio stats
//! biblio export --report overdue --format csv --output overdue.csv
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;

use biblio_persistence::LibraryStore;
use commands::{book, circulation, reader, stats};

/// Biblio - Library catalog, reader registry and circulation ledger
#[derive(Parser)]
#[command(name = "biblio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding books.dat, readers.dat and loans.dat
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Catalog management
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Reader registry management
    Reader {
        #[command(subcommand)]
        action: ReaderAction,
    },

    /// Borrow books for a reader
    Borrow {
        /// Reader id
        reader_id: u32,
        /// ISBNs to borrow, in the order they go on the loan (1 to 5)
        #[arg(required = true)]
        isbns: Vec<String>,
    },

    /// Return a loan and settle the late fine
    Return {
        /// Reader id (must own the loan)
        reader_id: u32,
        /// Loan id as shown by `biblio loans`
        loan_id: usize,
    },

    /// List loans
    Loans {
        /// Only loans of this reader id
        #[arg(long)]
        reader: Option<u32>,
        /// Only loans of readers whose name contains this text
        #[arg(long)]
        name: Option<String>,
    },

    /// Show overdue loans with estimated fines
    Overdue,

    /// Show library statistics
    Stats,

    /// Export a report
    Export {
        /// Which report to export
        #[arg(long, default_value = "overdue")]
        report: ReportKind,
        /// Report format
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        /// Output file path (stdout when absent)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum BookAction {
    /// Add a new title to the catalog
    Add {
        /// ISBN (exactly 10 digits)
        isbn: String,
        /// Title
        title: String,
        /// Author
        #[arg(long)]
        author: String,
        /// Publisher
        #[arg(long)]
        publisher: String,
        /// Publication year
        #[arg(long)]
        year: i32,
        /// Category
        #[arg(long)]
        category: String,
        /// Cover price in VND
        #[arg(long)]
        price: Decimal,
        /// Copies available for lending
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Update fields of an existing title
    Update {
        /// ISBN of the title to update
        isbn: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        quantity: Option<u32>,
    },
    /// Remove a title from the catalog
    Remove {
        /// ISBN of the title to remove
        isbn: String,
    },
    /// Show one title
    Show {
        /// ISBN to look up
        isbn: String,
    },
    /// List all titles
    List,
    /// Search titles by text
    Search {
        /// Text to look for
        term: String,
        /// Which field to search
        #[arg(long, default_value = "any")]
        by: SearchField,
    },
}

#[derive(Subcommand)]
pub enum ReaderAction {
    /// Register a new reader and issue a card
    Add {
        /// Full name
        name: String,
        /// National id (CMND/CCCD)
        #[arg(long)]
        national_id: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,
        /// Gender
        #[arg(long)]
        gender: GenderArg,
        /// Email
        #[arg(long, default_value = "")]
        email: String,
        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Address
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Update fields of a reader
    Update {
        /// Reader id
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        national_id: Option<String>,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long)]
        gender: Option<GenderArg>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Remove a reader from the registry
    Remove {
        /// Reader id
        id: u32,
    },
    /// List all readers
    List,
    /// Search readers by name or email
    Search {
        /// Text to look for
        term: String,
    },
    /// Look up a reader by national id
    Find {
        /// National id (exact match)
        national_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl GenderArg {
    pub fn to_core_type(&self) -> biblio_core::Gender {
        match self {
            GenderArg::Male => biblio_core::Gender::Male,
            GenderArg::Female => biblio_core::Gender::Female,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SearchField {
    Title,
    Author,
    Any,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
    Markdown,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportKind {
    Overdue,
    Stats,
    Snapshot,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::debug!("Using data directory {:?}", cli.data_dir);
    let store = LibraryStore::new(&cli.data_dir);

    match cli.command {
        Commands::Book { action } => {
            book::handle(&store, action)?;
        }

        Commands::Reader { action } => {
            reader::handle(&store, action)?;
        }

        Commands::Borrow { reader_id, isbns } => {
            circulation::borrow(&store, reader_id, &isbns)?;
        }

        Commands::Return { reader_id, loan_id } => {
            circulation::return_loan(&store, reader_id, loan_id)?;
        }

        Commands::Loans { reader, name } => {
            circulation::list_loans(&store, reader, name.as_deref())?;
        }

        Commands::Overdue => {
            stats::show_overdue(&store)?;
        }

        Commands::Stats => {
            stats::show_stats(&store)?;
        }

        Commands::Export {
            report,
            format,
            output,
        } => {
            stats::export(&store, report, format, output)?;
        }
    }

    Ok(())
}
