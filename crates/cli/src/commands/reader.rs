//! Reader registry commands

use anyhow::{Context, Result};
use biblio_core::{Reader, ReaderPatch, Registration};
use biblio_persistence::LibraryStore;
use chrono::Utc;

use super::truncate;
use crate::ReaderAction;

/// Handle reader subcommands
pub fn handle(store: &LibraryStore, action: ReaderAction) -> Result<()> {
    match action {
        ReaderAction::Add {
            name,
            national_id,
            birth_date,
            gender,
            email,
            phone,
            address,
        } => {
            let registration = Registration {
                name,
                national_id,
                birth_date,
                gender: gender.to_core_type(),
                email,
                phone,
                address,
            };
            register_reader(store, registration)?;
        }
        ReaderAction::Update {
            id,
            name,
            national_id,
            birth_date,
            gender,
            email,
            phone,
            address,
        } => {
            let patch = ReaderPatch {
                name,
                national_id,
                birth_date,
                gender: gender.map(|g| g.to_core_type()),
                email,
                phone,
                address,
            };
            update_reader(store, id, patch)?;
        }
        ReaderAction::Remove { id } => {
            remove_reader(store, id)?;
        }
        ReaderAction::List => {
            list_readers(store)?;
        }
        ReaderAction::Search { term } => {
            search_readers(store, &term)?;
        }
        ReaderAction::Find { national_id } => {
            find_reader(store, &national_id)?;
        }
    }

    Ok(())
}

/// Register a new reader and issue a library card
fn register_reader(store: &LibraryStore, registration: Registration) -> Result<()> {
    let mut library = store.load().context("Failed to load library data")?;

    let id = library.registry.register(registration, Utc::now())?;
    store.save(&library).context("Failed to save library data")?;

    if let Some(reader) = library.registry.find_by_id(id) {
        println!("✅ Registered reader:");
        println!("   ID:           {}", reader.id);
        println!("   Name:         {}", reader.name);
        println!("   National ID:  {}", reader.national_id);
        println!("   Member since: {}", reader.membership_year);
        println!(
            "   Card expires: {}",
            reader.card_expires_at().format("%Y-%m-%d")
        );
    }

    Ok(())
}

/// Update fields of a reader
fn update_reader(store: &LibraryStore, id: u32, patch: ReaderPatch) -> Result<()> {
    let mut library = store.load().context("Failed to load library data")?;

    library.registry.update(id, patch)?;
    store.save(&library).context("Failed to save library data")?;

    println!("✅ Updated reader #{}", id);
    Ok(())
}

/// Remove a reader from the registry
fn remove_reader(store: &LibraryStore, id: u32) -> Result<()> {
    let mut library = store.load().context("Failed to load library data")?;

    let reader = library.registry.remove(id)?;
    store.save(&library).context("Failed to save library data")?;

    println!("✅ Removed reader #{} ({})", reader.id, reader.name);
    Ok(())
}

/// List all readers
fn list_readers(store: &LibraryStore) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;

    if library.registry.is_empty() {
        println!("No readers registered.");
        return Ok(());
    }

    let readers: Vec<&Reader> = library.registry.iter().collect();
    print_reader_table(&readers);
    Ok(())
}

/// Search readers by name or email
fn search_readers(store: &LibraryStore, term: &str) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;

    let matches = library.registry.search(term);
    if matches.is_empty() {
        println!("No readers matched '{}'.", term);
        return Ok(());
    }

    print_reader_table(&matches);
    Ok(())
}

/// Look up a reader by national id
fn find_reader(store: &LibraryStore, national_id: &str) -> Result<()> {
    let library = store.load().context("Failed to load library data")?;

    match library.registry.find_by_national_id(national_id) {
        Some(reader) => {
            let now = Utc::now();
            println!("📋 Reader Details");
            println!("   ID:           {}", reader.id);
            println!("   Name:         {}", reader.name);
            println!("   National ID:  {}", reader.national_id);
            println!("   Birth date:   {}", reader.birth_date);
            println!("   Gender:       {}", reader.gender.as_str());
            if !reader.email.is_empty() {
                println!("   Email:        {}", reader.email);
            }
            if !reader.phone.is_empty() {
                println!("   Phone:        {}", reader.phone);
            }
            if !reader.address.is_empty() {
                println!("   Address:      {}", reader.address);
            }
            println!("   Member since: {}", reader.membership_year);
            println!(
                "   Card expires: {}",
                reader.card_expires_at().format("%Y-%m-%d")
            );
            if !reader.card_valid_at(now) {
                println!("   ⚠️  Card has expired");
            }
        }
        None => {
            println!("❌ No reader with national id '{}'", national_id);
        }
    }

    Ok(())
}

fn print_reader_table(readers: &[&Reader]) {
    println!(
        "{:<6} {:<24} {:<14} {:<8} {:<12} {:<12}",
        "ID", "NAME", "NATIONAL ID", "GENDER", "PHONE", "CARD EXPIRES"
    );
    println!("{}", "-".repeat(80));
    for reader in readers {
        println!(
            "{:<6} {:<24} {:<14} {:<8} {:<12} {:<12}",
            reader.id,
            truncate(&reader.name, 24),
            reader.national_id,
            reader.gender.as_str(),
            reader.phone,
            reader.card_expires_at().format("%Y-%m-%d").to_string()
        );
    }
}
