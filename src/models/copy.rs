//! Physical copy model and borrow history types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::{clamp_count, trim_or_empty};

/// Circulation status of a single physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    Available,
    Lost,
    Damaged,
    Borrowed,
    Pending,
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Pending
    }
}

impl CopyStatus {
    /// Parse a caller-supplied status string; absent falls back to `Pending`.
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        let trimmed = trim_or_empty(value);
        if trimmed.is_empty() {
            return Ok(CopyStatus::Pending);
        }
        match trimmed.as_str() {
            "available" => Ok(CopyStatus::Available),
            "lost" => Ok(CopyStatus::Lost),
            "damaged" => Ok(CopyStatus::Damaged),
            "borrowed" => Ok(CopyStatus::Borrowed),
            "pending" => Ok(CopyStatus::Pending),
            _ => Err(AppError::Validation("invalid copy status".to_string())),
        }
    }
}

/// One loan event; open (outstanding) while `return_time` is empty
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub borrower: String,
    pub borrow_time: String,
    pub return_time: String,
}

impl BorrowRecord {
    pub fn is_outstanding(&self) -> bool {
        self.return_time.is_empty()
    }
}

/// A physical copy of a book, individually tracked for circulation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCopy {
    pub id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: CopyStatus,
    #[serde(default)]
    pub borrow_count: u32,
    #[serde(default)]
    pub borrow_records: Vec<BorrowRecord>,
}

impl BookCopy {
    /// Most recently appended record that is still outstanding, if any.
    pub fn latest_outstanding_record(&mut self) -> Option<&mut BorrowRecord> {
        self.borrow_records
            .iter_mut()
            .rev()
            .find(|record| record.is_outstanding())
    }
}

/// Copy payload for creation; every field is optional at the boundary
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCopyRequest {
    pub id: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub borrow_count: Option<i64>,
    pub borrow_records: Option<Vec<BorrowRecordPayload>>,
}

/// Partial-update payload for a copy; omitted fields are untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCopyRequest {
    pub id: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub borrow_count: Option<i64>,
    pub borrow_records: Option<Vec<BorrowRecordPayload>>,
}

/// Untrusted borrow-record shape as it arrives in payloads or the document
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecordPayload {
    pub borrower: Option<String>,
    pub borrow_time: Option<String>,
    pub return_time: Option<String>,
}

impl BorrowRecordPayload {
    pub fn normalize(&self) -> BorrowRecord {
        BorrowRecord {
            borrower: trim_or_empty(self.borrower.as_deref()),
            borrow_time: trim_or_empty(self.borrow_time.as_deref()),
            return_time: trim_or_empty(self.return_time.as_deref()),
        }
    }
}

impl CreateCopyRequest {
    /// Produce a canonical copy record. `id` must already be resolved
    /// (caller-supplied or generated) and non-empty.
    pub fn normalize(&self, id: String) -> AppResult<BookCopy> {
        Ok(BookCopy {
            id,
            location: trim_or_empty(self.location.as_deref()),
            status: CopyStatus::parse(self.status.as_deref())?,
            borrow_count: clamp_count(self.borrow_count),
            borrow_records: self
                .borrow_records
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(BorrowRecordPayload::normalize)
                .collect(),
        })
    }
}

/// Next generated copy id for a book: `{bookId}-NN`, where NN is one past
/// the highest numeric suffix among existing copies with that prefix.
pub fn next_copy_id(book_id: &str, copies: &[BookCopy]) -> String {
    let prefix = format!("{book_id}-");
    let next = copies
        .iter()
        .filter_map(|copy| copy.id.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .map_or(1, |max| max + 1);
    format!("{prefix}{next:02}")
}

/// Borrow request body
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub borrower: Option<String>,
    pub borrow_time: Option<String>,
}

/// Return request body
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub return_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy_with_id(id: &str) -> BookCopy {
        BookCopy {
            id: id.to_string(),
            location: String::new(),
            status: CopyStatus::Pending,
            borrow_count: 0,
            borrow_records: Vec::new(),
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(CopyStatus::parse(Some("borrowed")).unwrap(), CopyStatus::Borrowed);
        assert_eq!(CopyStatus::parse(Some(" available ")).unwrap(), CopyStatus::Available);
        assert_eq!(CopyStatus::parse(None).unwrap(), CopyStatus::Pending);
        assert_eq!(CopyStatus::parse(Some("")).unwrap(), CopyStatus::Pending);
        assert!(CopyStatus::parse(Some("checked-out")).is_err());
    }

    #[test]
    fn test_next_copy_id_starts_at_one() {
        assert_eq!(next_copy_id("B100", &[]), "B100-01");
    }

    #[test]
    fn test_next_copy_id_increments_past_max() {
        let copies = vec![copy_with_id("B100-01"), copy_with_id("B100-07")];
        assert_eq!(next_copy_id("B100", &copies), "B100-08");
    }

    #[test]
    fn test_next_copy_id_ignores_foreign_formats() {
        let copies = vec![copy_with_id("B100-xx"), copy_with_id("OTHER-05")];
        assert_eq!(next_copy_id("B100", &copies), "B100-01");
    }

    #[test]
    fn test_normalize_clamps_and_trims() {
        let request = CreateCopyRequest {
            location: Some("  shelf 3 ".to_string()),
            borrow_count: Some(-4),
            ..Default::default()
        };
        let copy = request.normalize("B1-01".to_string()).unwrap();
        assert_eq!(copy.location, "shelf 3");
        assert_eq!(copy.borrow_count, 0);
        assert_eq!(copy.status, CopyStatus::Pending);
        assert!(copy.borrow_records.is_empty());
    }

    #[test]
    fn test_latest_outstanding_record_scans_in_reverse() {
        let mut copy = copy_with_id("B1-01");
        copy.borrow_records = vec![
            BorrowRecord {
                borrower: "first".to_string(),
                borrow_time: "2024-01-01 09:00".to_string(),
                return_time: "2024-01-05 09:00".to_string(),
            },
            BorrowRecord {
                borrower: "second".to_string(),
                borrow_time: "2024-02-01 09:00".to_string(),
                return_time: String::new(),
            },
        ];
        let record = copy.latest_outstanding_record().unwrap();
        assert_eq!(record.borrower, "second");
    }
}
