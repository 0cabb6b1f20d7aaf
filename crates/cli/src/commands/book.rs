//! Catalog management commands

use anyhow::{Context, Result};
use biblio_core::{Book, BookPatch, Isbn};
use biblio_persistence::LibraryStore;

use super::truncate;
use crate::{BookAction, SearchField};

/// Handle book subcommands
pub fn handle(store: &LibraryStore, action: BookAction) -> Result<()> {
    match action {
        BookAction::Add {
            isbn,
            title,
            author,
            publisher,
            year,
            category,
            price,
            quantity,
        } => {
            let book = Book {
                isbn: isbn.parse()?,
                title,
                author,
                publisher,
                year,
                category,
                price,
                quantity,
            };
            add_book(store, book)?;
        }
        BookAction::Update {
            isbn,
            title,
            author,
            publisher,
            year,
            category,
            price,
            quantity,
        } => {
            let patch = BookPatch {
                title,
                author,
                publisher,
                year,
                category,
                price,
                quantity,
            };
            update_book(store, &isbn, patch)?;
        }
        BookAction::Remove { isbn } => {
            remove_book(store, &isbn)?;
        }
        BookAction::Show { isbn } => {
            show_book(store, &isbn)?;
        }
        BookAction::List => {
            list_books(store)?;
        }
        BookAction::Search { term, by } => {
            search_books(store, &term, by)?;
        }
    }

    Ok(())
}

/// Add a new title to the catalog
fn add_book(store: &LibraryStore, book: Book) -> Result<()> {
    let mut library = store.load().context("Failed to load library data")?;

    let isbn = book.isbn.clone();
    library.catalog.add(book)?;
    store.save(&library).context("Failed to save library data")?;

    if let Some(book) = library.catalog.find_by_isbn(&isbn) {
        println!("✅ Added book to catalog:");
        println!("   ISBN:      {}", book.isbn);
        println!("   Title:     {}", book.title);
        println!("   Author:    {}", book.author);
        println!("   Publisher: {}", book.publisher);
        println!("   Year:      {}", book.year);
        println!("   Category:  {}", book.category);
        println!("   Price:     {} VND", book.price);
        println!("   Quantity:  {}", book.quantity);
    }

    Ok(())
}

/// Update fields of an existing title
fn update_book(store: &LibraryStore, isbn: &str, patch: BookPatch) -> Result<()> {
    if patch.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }

    let isbn: Isbn = isbn.parse()?;
    let mut library = store.load().context("Failed to load library data")?;

    library.catalog.update(&isbn, patch)?;
    store.save(&library).context("Failed to save library data")?;

    println!("✅ Updated book {}", isbn);
    Ok(())
}

/// Remove a title from the catalog
fn remove_book(store: &LibraryStore, isbn: &str) -> Result<()> {
    let isbn: Isbn = isbn.parse()?;
    let mut library = store.load().context("Failed to load library data")?;

    let book = library.catalog.remove(&isbn)?;
    store.save(&library).context("Failed to save library data")?;

    println!("✅ Removed \"{}\" ({})", book.title, book.isbn);
    Ok(())
}

/// Show one title
fn show_book(store: &LibraryStore, isbn: &str) -> Result<()> {
    let isbn: Isbn = isbn.parse()?;
    let library = store.load().context("Failed to load library data")?;

    match library.catalog.find_by_isbn(&isbn) {
        Some(book) => {
            println!("📋 Book Details");
            println!("   ISBN:      {}", book.isbn);
            println!("   Title:     {}", book.title);
            println!("   Author:    {}", book.author);
            println!("   Publisher: {}", book.publisher);
            println!("   Year:      {}", book.year);
            println!("   Category:  {}", book.category);
            println!("   Price:     {} VND", book.price);
            println!("   Quantity:  {}", book.quantity);
            if !book.is_available() {
                println!("   ⚠️  No copies available for lending");
            }
        }
        None => {
            println!("❌ Book '{}' not found", isbn);
        }
    }

    Ok(())
}

/// List all titles
fn list_books(store: &LibraryStore) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;

    if library.catalog.is_empty() {
        println!("No books in the catalog.");
        return Ok(());
    }

    let books: Vec<&Book> = library.catalog.iter().collect();
    print_book_table(&books);
    Ok(())
}

/// Search titles by text
fn search_books(store: &LibraryStore, term: &str, by: SearchField) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;

    let matches = match by {
        SearchField::Title => library.catalog.search_by_title(term),
        SearchField::Author => library.catalog.search_by_author(term),
        SearchField::Any => library.catalog.search(term),
    };

    if matches.is_empty() {
        println!("No books matched '{}'.", term);
        return Ok(());
    }

    print_book_table(&matches);
    Ok(())
}

fn print_book_table(books: &[&Book]) {
    println!(
        "{:<12} {:<30} {:<20} {:<6} {:<14} {:>12} {:>4}",
        "ISBN", "TITLE", "AUTHOR", "YEAR", "CATEGORY", "PRICE", "QTY"
    );
    println!("{}", "-".repeat(104));
    for book in books {
        println!(
            "{:<12} {:<30} {:<20} {:<6} {:<14} {:>12} {:>4}",
            book.isbn.as_str(),
            truncate(&book.title, 30),
            truncate(&book.author, 20),
            book.year,
            truncate(&book.category, 14),
            book.price.to_string(),
            book.quantity
        );
    }
}
