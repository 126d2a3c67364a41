//! Durable document store for the catalog

pub mod json_file;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::AppResult, models::Book};

pub use json_file::JsonFileStore;

/// The single durable document holding the whole catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Persistence seam: load once at startup, fully rewrite after every
/// mutation. Implementations must make `save` atomic for a single process.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> AppResult<CatalogDocument>;
    async fn save(&self, document: &CatalogDocument) -> AppResult<()>;
}
