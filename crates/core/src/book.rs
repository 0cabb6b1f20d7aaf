//! # Book Module
//!
//! Định nghĩa Isbn, Book và Catalog - danh mục sách của thư viện.
//! Catalog sở hữu toàn bộ book records, kể cả inventory (số bản còn lại
//! để cho mượn); circulation ledger chỉ tham chiếu sách qua ISBN.

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sức chứa tối đa của Catalog
pub const MAX_BOOKS: usize = 1000;

/// Mã ISBN dạng 10 chữ số.
///
/// Khóa chính của Book. Chỉ construct được qua [`Isbn::new`] hoặc
/// `parse()`, nên một giá trị `Isbn` luôn đúng format.
///
/// # Examples
/// ```
/// use biblio_core::Isbn;
///
/// let isbn: Isbn = "1234567890".parse().unwrap();
/// assert_eq!(isbn.as_str(), "1234567890");
/// assert!("12345".parse::<Isbn>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isbn(String);

impl Isbn {
    /// Tạo Isbn mới, validate đúng 10 chữ số
    pub fn new(s: &str) -> CoreResult<Self> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(CoreError::InvalidIsbn(s.to_string()))
        }
    }

    /// Kiểm tra format: đúng 10 ký tự, toàn chữ số
    pub fn is_valid(s: &str) -> bool {
        s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Isbn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Một đầu sách trong thư viện.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Mã ISBN (khóa chính)
    pub isbn: Isbn,
    /// Tựa sách
    pub title: String,
    /// Tác giả
    pub author: String,
    /// Nhà xuất bản
    pub publisher: String,
    /// Năm xuất bản
    pub year: i32,
    /// Thể loại
    pub category: String,
    /// Giá bìa (VND)
    pub price: Decimal,
    /// Số bản còn lại để cho mượn; giảm khi mượn, tăng khi trả
    pub quantity: u32,
}

impl Book {
    /// Còn bản nào để cho mượn không
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Tổng giá trị tồn kho của đầu sách này (giá × số bản)
    pub fn inventory_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.isbn, self.title, self.author)
    }
}

/// Cập nhật từng field của Book; field `None` giữ nguyên giá trị cũ.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl BookPatch {
    /// Patch rỗng - không thay đổi gì
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publisher.is_none()
            && self.year.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

/// Danh mục sách của thư viện.
///
/// Books giữ theo thứ tự thêm vào; mọi lookup là linear scan
/// (quy mô tối đa [`MAX_BOOKS`] đầu sách).
#[derive(Debug)]
pub struct Catalog {
    books: Vec<Book>,
    capacity: usize,
}

impl Catalog {
    /// Tạo Catalog với sức chứa mặc định
    pub fn new() -> Self {
        Self::bounded(MAX_BOOKS)
    }

    /// Tạo Catalog với sức chứa cho trước (dùng trong tests)
    pub fn bounded(capacity: usize) -> Self {
        Self {
            books: Vec::new(),
            capacity,
        }
    }

    /// Thêm đầu sách mới.
    ///
    /// Từ chối khi catalog đầy, giá âm, hoặc ISBN đã tồn tại.
    pub fn add(&mut self, book: Book) -> CoreResult<()> {
        if self.books.len() >= self.capacity {
            return Err(CoreError::CatalogFull(self.capacity));
        }
        if book.price.is_sign_negative() {
            return Err(CoreError::InvalidPrice(book.price.to_string()));
        }
        if self.find_by_isbn(&book.isbn).is_some() {
            return Err(CoreError::DuplicateIsbn(book.isbn.to_string()));
        }
        self.books.push(book);
        Ok(())
    }

    /// Tìm sách theo ISBN (exact match)
    pub fn find_by_isbn(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.iter().find(|b| &b.isbn == isbn)
    }

    /// Tìm sách theo ISBN, trả về mutable reference
    pub fn find_by_isbn_mut(&mut self, isbn: &Isbn) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| &b.isbn == isbn)
    }

    /// Cập nhật các field có trong patch; field vắng giữ nguyên
    pub fn update(&mut self, isbn: &Isbn, patch: BookPatch) -> CoreResult<()> {
        if let Some(price) = patch.price {
            if price.is_sign_negative() {
                return Err(CoreError::InvalidPrice(price.to_string()));
            }
        }
        let book = self
            .find_by_isbn_mut(isbn)
            .ok_or_else(|| CoreError::BookNotFound(isbn.to_string()))?;
        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        if let Some(publisher) = patch.publisher {
            book.publisher = publisher;
        }
        if let Some(year) = patch.year {
            book.year = year;
        }
        if let Some(category) = patch.category {
            book.category = category;
        }
        if let Some(price) = patch.price {
            book.price = price;
        }
        if let Some(quantity) = patch.quantity {
            book.quantity = quantity;
        }
        Ok(())
    }

    /// Xóa đầu sách khỏi catalog, trả về record đã xóa
    pub fn remove(&mut self, isbn: &Isbn) -> CoreResult<Book> {
        let index = self
            .books
            .iter()
            .position(|b| &b.isbn == isbn)
            .ok_or_else(|| CoreError::BookNotFound(isbn.to_string()))?;
        Ok(self.books.remove(index))
    }

    /// Tìm theo tựa sách (substring match)
    pub fn search_by_title(&self, term: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.title.contains(term))
            .collect()
    }

    /// Tìm theo tác giả (substring match)
    pub fn search_by_author(&self, term: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.author.contains(term))
            .collect()
    }

    /// Tìm theo tựa sách hoặc tác giả
    pub fn search(&self, term: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.title.contains(term) || b.author.contains(term))
            .collect()
    }

    /// Iterator qua toàn bộ sách, theo thứ tự thêm vào
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    /// Số đầu sách hiện có
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Sức chứa tối đa
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
