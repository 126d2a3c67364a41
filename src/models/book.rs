//! Book (catalog entry) model and related types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::copy::{BookCopy, CopyStatus, CreateCopyRequest};
use super::{clamp_count, clamp_non_negative, trim_or_empty};

/// Aggregate circulation status of a book, derived from its copies
/// except for `Forbidden`, which is only ever set explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "allBorrowed")]
    AllBorrowed,
    #[serde(rename = "forbidden")]
    Forbidden,
}

impl Default for BookStatus {
    fn default() -> Self {
        BookStatus::Normal
    }
}

impl BookStatus {
    /// Parse a caller-supplied status string; absent falls back to `Normal`.
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        let trimmed = trim_or_empty(value);
        if trimmed.is_empty() {
            return Ok(BookStatus::Normal);
        }
        match trimmed.as_str() {
            "normal" => Ok(BookStatus::Normal),
            "allBorrowed" => Ok(BookStatus::AllBorrowed),
            "forbidden" => Ok(BookStatus::Forbidden),
            _ => Err(AppError::Validation("invalid book status".to_string())),
        }
    }
}

/// A catalog entry representing a title, independent of its physical copies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub entry_date: String,
    #[serde(default)]
    pub borrow_count: u32,
    #[serde(default)]
    pub status: BookStatus,
    /// Derived: always equals `copies.len()`
    #[serde(default)]
    pub quantity: usize,
    #[serde(default)]
    pub copies: Vec<BookCopy>,
}

impl Book {
    /// Recompute derived state after any change to copy membership or a
    /// copy's status. Quantity is recomputed unconditionally; the status
    /// rule is skipped entirely while the book is `Forbidden`. Idempotent.
    pub fn recalculate(&mut self) {
        self.quantity = self.copies.len();

        if self.status == BookStatus::Forbidden {
            return;
        }

        let has_copies = !self.copies.is_empty();
        let all_borrowed =
            has_copies && self.copies.iter().all(|c| c.status == CopyStatus::Borrowed);
        let has_available = self
            .copies
            .iter()
            .any(|c| matches!(c.status, CopyStatus::Available | CopyStatus::Pending));

        if all_borrowed {
            self.status = BookStatus::AllBorrowed;
        } else if has_available || !has_copies {
            self.status = BookStatus::Normal;
        }
    }

    pub fn find_copy_mut(&mut self, copy_id: &str) -> Option<&mut BookCopy> {
        self.copies.iter_mut().find(|copy| copy.id == copy_id)
    }
}

/// Generate a catalog-unique book id. Timestamp-derived (`B{millis}`),
/// bumped past same-instant collisions within this process.
pub fn generate_book_id(books: &[Book]) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let candidate = format!("B{millis}");
        if !books.iter().any(|book| book.id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}

/// Book payload for creation; every field is optional except `name`,
/// which is checked during normalization
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub price: Option<f64>,
    pub pages: Option<i64>,
    pub isbn: Option<String>,
    pub entry_date: Option<String>,
    pub borrow_count: Option<i64>,
    pub status: Option<String>,
    pub copies: Option<Vec<CreateCopyRequest>>,
}

impl CreateBookRequest {
    /// Produce a canonical book record; `id` must already be resolved.
    /// Embedded copies are normalized as supplied, in order. Derived state
    /// is left for the caller to recalculate.
    pub fn normalize(&self, id: String) -> AppResult<Book> {
        let name = trim_or_empty(self.name.as_deref());
        if name.is_empty() {
            return Err(AppError::Validation("book name must not be empty".to_string()));
        }

        let mut copies = Vec::new();
        for payload in self.copies.as_deref().unwrap_or_default() {
            let copy_id = trim_or_empty(payload.id.as_deref());
            copies.push(payload.normalize(copy_id)?);
        }

        Ok(Book {
            id,
            name,
            author: trim_or_empty(self.author.as_deref()),
            publisher: trim_or_empty(self.publisher.as_deref()),
            publish_date: trim_or_empty(self.publish_date.as_deref()),
            price: clamp_non_negative(self.price),
            pages: clamp_count(self.pages),
            isbn: trim_or_empty(self.isbn.as_deref()),
            entry_date: trim_or_empty(self.entry_date.as_deref()),
            borrow_count: clamp_count(self.borrow_count),
            status: BookStatus::parse(self.status.as_deref())?,
            quantity: 0,
            copies,
        })
    }
}

/// Partial-update payload for a book; omitted fields are untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub price: Option<f64>,
    pub pages: Option<i64>,
    pub isbn: Option<String>,
    pub entry_date: Option<String>,
    pub borrow_count: Option<i64>,
    pub status: Option<String>,
}
