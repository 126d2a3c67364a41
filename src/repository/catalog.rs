//! Catalog state engine: book/copy records, borrow lifecycle, persistence
//!
//! All mutating operations validate their whole payload before touching the
//! in-memory state, then finish with a full rewrite of the durable document
//! while still holding the write lock. A persistence failure after the
//! in-memory mutation is surfaced to the caller without rollback.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{generate_book_id, CreateBookRequest, UpdateBookRequest},
        copy::{next_copy_id, BorrowRequest, CreateCopyRequest, ReturnRequest, UpdateCopyRequest},
        clamp_count, clamp_non_negative, stamp_or_now, trim_or_empty, Book, BookStatus,
        BorrowRecord, CopyStatus,
    },
    store::{CatalogDocument, DocumentStore},
};

pub struct CatalogRepository {
    books: RwLock<Vec<Book>>,
    store: Arc<dyn DocumentStore>,
}

impl CatalogRepository {
    /// Load the durable document and rebuild derived state for every book.
    pub async fn open(store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let mut document = store.load().await?;
        for book in &mut document.books {
            book.recalculate();
        }
        tracing::info!("Catalog loaded: {} book(s)", document.books.len());
        Ok(Self {
            books: RwLock::new(document.books),
            store,
        })
    }

    /// Full rewrite of the durable document. Called with the write lock held
    /// so no other mutation can interleave before the state is on disk.
    async fn persist(&self, books: &[Book]) -> AppResult<()> {
        let document = CatalogDocument {
            books: books.to_vec(),
        };
        self.store.save(&document).await
    }

    pub async fn list_books(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    pub async fn find_book(&self, book_id: &str) -> AppResult<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == book_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))
    }

    pub async fn create_book(&self, payload: CreateBookRequest) -> AppResult<Book> {
        let name = trim_or_empty(payload.name.as_deref());
        if name.is_empty() {
            return Err(AppError::Validation("book name must not be empty".to_string()));
        }

        let mut books = self.books.write().await;

        let desired_id = trim_or_empty(payload.id.as_deref());
        let book_id = if desired_id.is_empty() {
            generate_book_id(&books)
        } else {
            desired_id
        };
        if books.iter().any(|book| book.id == book_id) {
            return Err(AppError::Conflict("book id already exists".to_string()));
        }

        let mut book = payload.normalize(book_id)?;
        book.recalculate();

        // Newest first
        books.insert(0, book.clone());
        self.persist(&books).await?;
        Ok(book)
    }

    pub async fn update_book(&self, book_id: &str, payload: UpdateBookRequest) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == book_id)
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;

        // Validate the whole payload before touching the record, in the
        // order failures have always been reported: id, then name.
        let new_id = match payload.id.as_deref() {
            Some(raw) => {
                let value = raw.trim().to_string();
                if value.is_empty() {
                    return Err(AppError::Validation("book id must not be empty".to_string()));
                }
                let taken = books
                    .iter()
                    .enumerate()
                    .any(|(i, other)| i != index && other.id == value);
                if taken {
                    return Err(AppError::Conflict("book id already exists".to_string()));
                }
                Some(value)
            }
            None => None,
        };
        let new_name = match payload.name.as_deref() {
            Some(raw) => {
                let value = raw.trim().to_string();
                if value.is_empty() {
                    return Err(AppError::Validation("book name must not be empty".to_string()));
                }
                Some(value)
            }
            None => None,
        };
        let new_status = match payload.status.as_deref() {
            Some(_) => Some(BookStatus::parse(payload.status.as_deref())?),
            None => None,
        };

        let book = &mut books[index];

        if let Some(new_id) = new_id {
            book.id = new_id;
        }
        if let Some(name) = new_name {
            book.name = name;
        }
        if let Some(value) = payload.author.as_deref() {
            book.author = value.trim().to_string();
        }
        if let Some(value) = payload.publisher.as_deref() {
            book.publisher = value.trim().to_string();
        }
        if let Some(value) = payload.publish_date.as_deref() {
            book.publish_date = value.trim().to_string();
        }
        if payload.price.is_some() {
            book.price = clamp_non_negative(payload.price);
        }
        if payload.pages.is_some() {
            book.pages = clamp_count(payload.pages);
        }
        if let Some(value) = payload.isbn.as_deref() {
            book.isbn = value.trim().to_string();
        }
        if let Some(value) = payload.entry_date.as_deref() {
            book.entry_date = value.trim().to_string();
        }
        if payload.borrow_count.is_some() {
            book.borrow_count = clamp_count(payload.borrow_count);
        }
        if let Some(status) = new_status {
            book.status = status;
        }

        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    pub async fn delete_book(&self, book_id: &str) -> AppResult<()> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == book_id)
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;
        books.remove(index);
        self.persist(&books).await
    }

    pub async fn add_copy(&self, book_id: &str, payload: CreateCopyRequest) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book = Self::book_mut(&mut books, book_id)?;

        let desired_id = trim_or_empty(payload.id.as_deref());
        let copy_id = if desired_id.is_empty() {
            next_copy_id(&book.id, &book.copies)
        } else {
            desired_id
        };
        if book.copies.iter().any(|copy| copy.id == copy_id) {
            return Err(AppError::Conflict("copy id already exists".to_string()));
        }

        let copy = payload.normalize(copy_id)?;

        // Newest first, mirroring book ordering
        book.copies.insert(0, copy);
        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    pub async fn update_copy(
        &self,
        book_id: &str,
        copy_id: &str,
        payload: UpdateCopyRequest,
    ) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book_index = books
            .iter()
            .position(|book| book.id == book_id)
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;
        let copy_index = books[book_index]
            .copies
            .iter()
            .position(|copy| copy.id == copy_id)
            .ok_or_else(|| AppError::NotFound("copy not found".to_string()))?;

        // Validate the whole payload before touching the record.
        let new_id = match payload.id.as_deref() {
            Some(raw) => {
                let value = raw.trim().to_string();
                if value.is_empty() {
                    return Err(AppError::Validation("copy id must not be empty".to_string()));
                }
                let taken = books[book_index]
                    .copies
                    .iter()
                    .enumerate()
                    .any(|(i, other)| i != copy_index && other.id == value);
                if taken {
                    return Err(AppError::Conflict("copy id already exists".to_string()));
                }
                Some(value)
            }
            None => None,
        };
        let new_status = match payload.status.as_deref() {
            Some(_) => Some(CopyStatus::parse(payload.status.as_deref())?),
            None => None,
        };
        let new_records: Option<Vec<BorrowRecord>> = payload
            .borrow_records
            .as_deref()
            .map(|records| records.iter().map(|r| r.normalize()).collect());

        let book = &mut books[book_index];
        let copy = &mut book.copies[copy_index];

        if let Some(new_id) = new_id {
            copy.id = new_id;
        }
        if let Some(value) = payload.location.as_deref() {
            copy.location = value.trim().to_string();
        }
        if let Some(status) = new_status {
            copy.status = status;
        }
        if payload.borrow_count.is_some() {
            copy.borrow_count = clamp_count(payload.borrow_count);
        }
        if let Some(records) = new_records {
            copy.borrow_records = records;
        }

        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    pub async fn remove_copy(&self, book_id: &str, copy_id: &str) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book = Self::book_mut(&mut books, book_id)?;

        let index = book
            .copies
            .iter()
            .position(|copy| copy.id == copy_id)
            .ok_or_else(|| AppError::NotFound("copy not found".to_string()))?;
        book.copies.remove(index);

        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    /// Borrow a copy. Legal from any non-borrowed state, including `lost`
    /// and `damaged` (recovering such a copy by lending it out is allowed).
    pub async fn borrow_copy(
        &self,
        book_id: &str,
        copy_id: &str,
        payload: BorrowRequest,
    ) -> AppResult<Book> {
        let borrower = trim_or_empty(payload.borrower.as_deref());

        let mut books = self.books.write().await;
        let book = Self::book_mut(&mut books, book_id)?;
        let copy = book
            .find_copy_mut(copy_id)
            .ok_or_else(|| AppError::NotFound("copy not found".to_string()))?;

        if copy.status == CopyStatus::Borrowed {
            return Err(AppError::Conflict("copy is already borrowed".to_string()));
        }
        if borrower.is_empty() {
            return Err(AppError::Validation("borrower must not be empty".to_string()));
        }

        let borrow_time = stamp_or_now(payload.borrow_time.as_deref());
        copy.status = CopyStatus::Borrowed;
        copy.borrow_count += 1;
        copy.borrow_records.push(BorrowRecord {
            borrower,
            borrow_time,
            return_time: String::new(),
        });
        book.borrow_count += 1;

        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    pub async fn return_copy(
        &self,
        book_id: &str,
        copy_id: &str,
        payload: ReturnRequest,
    ) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book = Self::book_mut(&mut books, book_id)?;
        let copy = book
            .find_copy_mut(copy_id)
            .ok_or_else(|| AppError::NotFound("copy not found".to_string()))?;

        if copy.status != CopyStatus::Borrowed {
            return Err(AppError::Conflict(
                "copy is not currently borrowed".to_string(),
            ));
        }

        let return_time = stamp_or_now(payload.return_time.as_deref());
        copy.status = CopyStatus::Available;
        // Tolerate a missing open record: the status transition still holds.
        if let Some(record) = copy.latest_outstanding_record() {
            record.return_time = return_time;
        }

        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    /// Move a copy into circulation unconditionally. History and counts
    /// are left untouched.
    pub async fn archive_copy(&self, book_id: &str, copy_id: &str) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book = Self::book_mut(&mut books, book_id)?;
        let copy = book
            .find_copy_mut(copy_id)
            .ok_or_else(|| AppError::NotFound("copy not found".to_string()))?;

        copy.status = CopyStatus::Available;

        book.recalculate();
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(updated)
    }

    fn book_mut<'a>(books: &'a mut [Book], book_id: &str) -> AppResult<&'a mut Book> {
        books
            .iter_mut()
            .find(|book| book.id == book_id)
            .ok_or_else(|| AppError::NotFound("book not found".to_string()))
    }

}
