use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Reception;

/// Flat projection of a persisted reception, shaped for the automation
/// webhook. The flow consumes string fields, so optional columns collapse
/// to empty strings here. `bsl2` stays internal and is not part of the
/// event body.
#[derive(Debug, Clone, Serialize)]
pub struct ReceptionEvent {
    pub submission_id: i64,
    pub category: String,
    pub reference: String,
    pub item_name: String,
    pub supplier: String,
    pub quantity: String,
    pub item_type: String,
    pub project_manager: String,
    pub status: String,
    pub storage_location: String,
    pub location: String,
    pub sub_location: String,
    pub received_by: String,
    pub received_by_id: String,
    pub client: String,
    pub comments: String,
    pub received_at: DateTime<Utc>,
}

impl ReceptionEvent {
    pub fn from_reception(r: &Reception) -> Self {
        let or_empty = |v: &Option<String>| v.clone().unwrap_or_default();

        ReceptionEvent {
            submission_id: r.id,
            category: r.category.as_str().to_string(),
            reference: or_empty(&r.reference),
            item_name: r.item_name.clone(),
            supplier: or_empty(&r.supplier),
            quantity: or_empty(&r.quantity),
            item_type: or_empty(&r.item_type),
            project_manager: or_empty(&r.project_manager),
            status: or_empty(&r.package_status),
            // The flow reads storage_location; fall back to the free-form
            // location when the dropdown was left empty.
            storage_location: r
                .storage_location
                .clone()
                .or_else(|| r.location.clone())
                .unwrap_or_default(),
            location: or_empty(&r.location),
            sub_location: or_empty(&r.sub_location),
            received_by: or_empty(&r.received_by),
            received_by_id: or_empty(&r.received_by_id),
            client: or_empty(&r.client),
            comments: or_empty(&r.comments),
            received_at: r.received_at,
        }
    }
}
