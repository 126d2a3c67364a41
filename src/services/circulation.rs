//! Borrow lifecycle service

use crate::{
    error::AppResult,
    models::{
        copy::{BorrowRequest, ReturnRequest},
        Book,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend a copy out
    pub async fn borrow_copy(
        &self,
        book_id: &str,
        copy_id: &str,
        payload: BorrowRequest,
    ) -> AppResult<Book> {
        self.repository
            .catalog
            .borrow_copy(book_id, copy_id, payload)
            .await
    }

    /// Take a borrowed copy back
    pub async fn return_copy(
        &self,
        book_id: &str,
        copy_id: &str,
        payload: ReturnRequest,
    ) -> AppResult<Book> {
        self.repository
            .catalog
            .return_copy(book_id, copy_id, payload)
            .await
    }

    /// Move a copy into circulation regardless of its prior state
    pub async fn archive_copy(&self, book_id: &str, copy_id: &str) -> AppResult<Book> {
        self.repository.catalog.archive_copy(book_id, copy_id).await
    }
}
