//! Flat-file JSON implementation of the document store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::AppResult;

use super::{CatalogDocument, DocumentStore};

/// Stores the catalog as one formatted JSON file. The file is created with
/// an empty catalog on first load and fully rewritten on every save via a
/// temp file + rename, so readers never see a partial document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn ensure_parent_dir(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    async fn write_document(&self, document: &CatalogDocument) -> AppResult<()> {
        self.ensure_parent_dir().await?;
        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = temp_path(&self.path);
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> AppResult<CatalogDocument> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content).map_err(|e| {
                crate::error::AppError::Internal(format!(
                    "catalog document {} is not valid JSON: {e}",
                    self.path.display()
                ))
            })?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let document = CatalogDocument::default();
                self.write_document(&document).await?;
                Ok(document)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &CatalogDocument) -> AppResult<()> {
        self.write_document(document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_creates_empty_document_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("library.json");
        let store = JsonFileStore::new(&path);

        let document = store.load().await.unwrap();
        assert!(document.books.is_empty());
        assert!(path.exists());

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("\"books\""));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        let store = JsonFileStore::new(&path);

        let mut document = store.load().await.unwrap();
        document.books.push(crate::models::Book {
            id: "B1".to_string(),
            name: "Solaris".to_string(),
            author: String::new(),
            publisher: String::new(),
            publish_date: String::new(),
            price: 0.0,
            pages: 0,
            isbn: String::new(),
            entry_date: String::new(),
            borrow_count: 0,
            status: crate::models::BookStatus::Normal,
            quantity: 0,
            copies: Vec::new(),
        });
        store.save(&document).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.books.len(), 1);
        assert_eq!(reloaded.books[0].name, "Solaris");
        assert!(!temp_path(&path).exists());
    }
}
