//! Repository layer owning the in-memory catalog state

pub mod catalog;

use std::sync::Arc;

use crate::{error::AppResult, store::DocumentStore};

/// Main repository struct, constructed once at startup and shared by handle
#[derive(Clone)]
pub struct Repository {
    pub catalog: Arc<catalog::CatalogRepository>,
}

impl Repository {
    /// Load the catalog from the document store and build the repository
    pub async fn open(store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        Ok(Self {
            catalog: Arc::new(catalog::CatalogRepository::open(store).await?),
        })
    }
}
