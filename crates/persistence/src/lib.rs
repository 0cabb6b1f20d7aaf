//! # Biblio Persistence
//!
//! Persistence layer cho Biblio - ba flat file text trong một thư mục
//! dữ liệu, mỗi file một loại record.
//!
//! ## Layout
//!
//! ```text
//! data/
//! ├── books.dat      danh mục sách
//! ├── readers.dat    sổ độc giả
//! └── loans.dat      sổ cái lưu thông
//! ```
//!
//! Mỗi file mở đầu bằng dòng số record, sau đó mỗi giá trị một dòng.
//! Format của loans.dat là contract với tool bên ngoài (xem
//! [`loans`]).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use biblio_persistence::LibraryStore;
//!
//! let store = LibraryStore::new("data");
//! let mut library = store.load()?;
//! // ... thao tác trên library.catalog / registry / ledger ...
//! store.save(&library)?;
//! ```

pub mod books;
pub mod error;
pub mod loans;
pub mod readers;
mod record;

pub use books::{load_books, save_books};
pub use error::{PersistenceError, PersistenceResult};
pub use loans::{load_loans, save_loans};
pub use readers::{load_readers, save_readers};

use biblio_circulation::CirculationLedger;
use biblio_core::{Catalog, Registry};
use std::fs;
use std::path::{Path, PathBuf};

/// Tên file danh mục sách
pub const BOOKS_FILE: &str = "books.dat";
/// Tên file sổ độc giả
pub const READERS_FILE: &str = "readers.dat";
/// Tên file sổ cái lưu thông
pub const LOANS_FILE: &str = "loans.dat";

/// Toàn bộ trạng thái thư viện trong bộ nhớ.
pub struct Library {
    pub catalog: Catalog,
    pub registry: Registry,
    pub ledger: CirculationLedger,
}

impl Library {
    /// Thư viện trống
    pub fn empty() -> Self {
        Self {
            catalog: Catalog::new(),
            registry: Registry::new(),
            ledger: CirculationLedger::new(),
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::empty()
    }
}

/// Store facade - load/save cả ba file dữ liệu cùng một chỗ.
pub struct LibraryStore {
    data_dir: PathBuf,
}

impl LibraryStore {
    /// Tạo store trên thư mục dữ liệu cho trước
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Đường dẫn file danh mục sách
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(BOOKS_FILE)
    }

    /// Đường dẫn file sổ độc giả
    pub fn readers_path(&self) -> PathBuf {
        self.data_dir.join(READERS_FILE)
    }

    /// Đường dẫn file sổ cái
    pub fn loans_path(&self) -> PathBuf {
        self.data_dir.join(LOANS_FILE)
    }

    /// Load cả ba file; file chưa tồn tại cho store rỗng
    pub fn load(&self) -> PersistenceResult<Library> {
        let catalog = load_books(&self.books_path())?;
        let registry = load_readers(&self.readers_path())?;
        let ledger = load_loans(&self.loans_path())?;
        tracing::debug!(
            "Loaded {} book(s), {} reader(s), {} loan(s) from {}",
            catalog.len(),
            registry.len(),
            ledger.len(),
            self.data_dir.display()
        );
        Ok(Library {
            catalog,
            registry,
            ledger,
        })
    }

    /// Ghi cả ba file; tự tạo thư mục dữ liệu nếu chưa có
    pub fn save(&self, library: &Library) -> PersistenceResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        save_books(&self.books_path(), &library.catalog)?;
        save_readers(&self.readers_path(), &library.registry)?;
        save_loans(&self.loans_path(), &library.ledger)?;
        tracing::debug!(
            "Saved {} book(s), {} reader(s), {} loan(s) to {}",
            library.catalog.len(),
            library.registry.len(),
            library.ledger.len(),
            self.data_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_core::{Book, Gender, Registration};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_empty_dir() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("data"));

        let library = store.load().unwrap();
        assert!(library.catalog.is_empty());
        assert!(library.registry.is_empty());
        assert!(library.ledger.is_empty());
    }

    #[test]
    fn test_save_creates_dir_and_roundtrips() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("data"));
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let mut library = Library::empty();
        library
            .catalog
            .add(Book {
                isbn: "1234567890".parse().unwrap(),
                title: "Sach Mot".to_string(),
                author: "Tac Gia".to_string(),
                publisher: "NXB Tre".to_string(),
                year: 2019,
                category: "Fiction".to_string(),
                price: dec!(70000),
                quantity: 4,
            })
            .unwrap();
        let reader_id = library
            .registry
            .register(
                Registration {
                    name: "Nguyen Van An".to_string(),
                    national_id: "012345678901".to_string(),
                    birth_date: "1995-04-12".parse().unwrap(),
                    gender: Gender::Male,
                    email: "an@example.com".to_string(),
                    phone: "0901234567".to_string(),
                    address: "Ha Noi".to_string(),
                },
                now,
            )
            .unwrap();
        library
            .ledger
            .create_loan(
                &library.registry,
                &mut library.catalog,
                reader_id,
                vec!["1234567890".parse().unwrap()],
                now,
            )
            .unwrap();

        store.save(&library).unwrap();
        assert!(store.books_path().exists());
        assert!(store.readers_path().exists());
        assert!(store.loans_path().exists());

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.catalog.len(), 1);
        assert_eq!(reloaded.registry.len(), 1);
        assert_eq!(reloaded.ledger.len(), 1);
        // Tồn kho đã trừ lúc mượn phải giữ nguyên qua round-trip
        assert_eq!(
            reloaded
                .catalog
                .find_by_isbn(&"1234567890".parse().unwrap())
                .unwrap()
                .quantity,
            3
        );
        assert!(!reloaded.ledger.get(0).unwrap().is_returned());
    }
}
