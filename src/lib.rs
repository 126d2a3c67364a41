//! Bookshelf Library Catalog Manager
//!
//! A Rust implementation of the Bookshelf catalog server, providing a REST
//! JSON API for managing books, their physical copies, and borrow history.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
