//! Catalog management service

use crate::{
    error::AppResult,
    models::{
        book::{CreateBookRequest, UpdateBookRequest},
        copy::{CreateCopyRequest, UpdateCopyRequest},
        Book,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books, newest first
    pub async fn list_books(&self) -> Vec<Book> {
        self.repository.catalog.list_books().await
    }

    /// Get a single book by id
    pub async fn get_book(&self, book_id: &str) -> AppResult<Book> {
        self.repository.catalog.find_book(book_id).await
    }

    /// Create a new book, optionally with embedded copies
    pub async fn create_book(&self, payload: CreateBookRequest) -> AppResult<Book> {
        self.repository.catalog.create_book(payload).await
    }

    /// Apply a partial update to a book
    pub async fn update_book(&self, book_id: &str, payload: UpdateBookRequest) -> AppResult<Book> {
        self.repository.catalog.update_book(book_id, payload).await
    }

    /// Delete a book and all of its copies
    pub async fn delete_book(&self, book_id: &str) -> AppResult<()> {
        self.repository.catalog.delete_book(book_id).await
    }

    /// Add a copy to a book
    pub async fn add_copy(&self, book_id: &str, payload: CreateCopyRequest) -> AppResult<Book> {
        self.repository.catalog.add_copy(book_id, payload).await
    }

    /// Apply a partial update to a copy
    pub async fn update_copy(
        &self,
        book_id: &str,
        copy_id: &str,
        payload: UpdateCopyRequest,
    ) -> AppResult<Book> {
        self.repository
            .catalog
            .update_copy(book_id, copy_id, payload)
            .await
    }

    /// Remove a copy from a book
    pub async fn remove_copy(&self, book_id: &str, copy_id: &str) -> AppResult<Book> {
        self.repository.catalog.remove_copy(book_id, copy_id).await
    }
}
