use serde::{Deserialize, Serialize};

/// A candidate value returned by the metadata lookup, used to fill or
/// enrich a submission. Transient; never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataOption {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_manager_id: Option<String>,
    #[serde(default)]
    pub bsl2: bool,
}
