use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Submission category. Determines the required-field set at validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Samples,
    Other,
}

impl Category {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "samples" => Some(Category::Samples),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Samples => "samples",
            Category::Other => "other",
        }
    }
}

/// One persisted reception record. Append-only: rows are never updated or
/// deleted after insertion.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Reception {
    pub id: i64,
    pub category: Category,
    pub received_at: DateTime<Utc>,
    pub item_name: String,
    pub quantity: Option<String>,
    pub supplier: Option<String>,
    pub item_type: Option<String>,
    pub project_manager: Option<String>,
    pub bsl2: bool,
    pub package_status: Option<String>,
    pub storage_location: Option<String>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub lot_number: Option<String>,
    pub catalog_number: Option<String>,
    pub client: Option<String>,
    pub received_by: Option<String>,
    pub received_by_id: Option<String>,
    pub comments: Option<String>,
    /// Task id (samples) or order id (other) the submission points at.
    pub reference: Option<String>,
    /// Resolved metadata option, when the lookup succeeded.
    pub enrichment: Option<serde_json::Value>,
    /// True when a lookup was attempted but the record went in without it.
    pub enrichment_missing: bool,
}
