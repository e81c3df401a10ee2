use std::net::IpAddr;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::db;
use crate::db::receptions::NewReception;
use crate::error::AppError;
use crate::models::{Category, Reception, ReceptionEvent};
use crate::state::SharedState;

use super::validator::{self, SubmissionForm};

pub struct PipelineOutcome {
    pub reception: Reception,
    pub warnings: Vec<String>,
}

/// One submission, start to finish: rate-limit, validate, enrich, persist,
/// notify. Validation and storage failures abort. A dead metadata upstream
/// or a failed notification degrade into warnings; a physical reception
/// event is never dropped because a side channel was down.
pub async fn run(
    state: &SharedState,
    peer_ip: Option<IpAddr>,
    raw: Value,
) -> Result<PipelineOutcome, AppError> {
    let ip = peer_ip.unwrap_or(IpAddr::from([127, 0, 0, 1]));
    state
        .submission_limiter
        .check(ip, state.config.rate_limit, state.config.rate_limit_window_secs)
        .map_err(AppError::RateLimited)?;

    let form = validator::validate(&raw).map_err(AppError::Validation)?;

    let mut warnings = Vec::new();
    let (enrichment, enrichment_missing) = enrich(state, &form, &mut warnings).await?;

    let reception = db::receptions::append(
        &state.pool,
        &new_reception(&form, enrichment, enrichment_missing),
    )
    .await?;

    notify(state, &reception, &mut warnings).await;

    Ok(PipelineOutcome {
        reception,
        warnings,
    })
}

async fn enrich(
    state: &SharedState,
    form: &SubmissionForm,
    warnings: &mut Vec<String>,
) -> Result<(Option<Value>, bool), AppError> {
    let Some(reference) = form.reference() else {
        return Ok((None, false));
    };
    if !state.metadata.enabled() {
        return Ok((None, false));
    }

    match state.metadata.resolve(form.category(), reference).await {
        Ok(Some(option)) => {
            let value = serde_json::to_value(&option)
                .map_err(|e| AppError::Internal(format!("Failed to encode enrichment: {e}")))?;
            Ok((Some(value), false))
        }
        Ok(None) => {
            if form.category() == Category::Samples {
                tracing::warn!("Task {reference} not found on the task board");
                warnings.push(format!(
                    "task {reference} not found on the task board; recorded without enrichment"
                ));
                Ok((None, true))
            } else {
                // No board backs "other" receptions; nothing was missed.
                Ok((None, false))
            }
        }
        Err(e) => {
            tracing::warn!("Metadata lookup failed for {reference}: {e}");
            warnings.push("metadata lookup unavailable; recorded without enrichment".to_string());
            Ok((None, true))
        }
    }
}

fn new_reception(
    form: &SubmissionForm,
    enrichment: Option<Value>,
    enrichment_missing: bool,
) -> NewReception {
    let details = form.details();

    // Backfill from the resolved task what the form left blank.
    let mut project_manager = details.project_manager.clone();
    let mut bsl2 = details.bsl2;
    if let Some(option) = &enrichment {
        if project_manager.is_none() {
            project_manager = option
                .get("project_manager")
                .and_then(|v| v.as_str())
                .map(String::from);
        }
        bsl2 = bsl2 || option.get("bsl2").and_then(|v| v.as_bool()).unwrap_or(false);
    }

    NewReception {
        category: form.category(),
        received_at: details.received_at.unwrap_or_else(Utc::now),
        item_name: form.item_name().to_string(),
        quantity: form.quantity().map(String::from),
        supplier: details.supplier.clone(),
        item_type: details.item_type.clone(),
        project_manager,
        bsl2,
        package_status: details.package_status.clone(),
        storage_location: details.storage_location.clone(),
        location: details.location.clone(),
        sub_location: details.sub_location.clone(),
        lot_number: details.lot_number.clone(),
        catalog_number: details.catalog_number.clone(),
        client: details.client.clone(),
        received_by: details.received_by.clone(),
        received_by_id: details.received_by_id.clone(),
        comments: details.comments.clone(),
        reference: form.reference().map(String::from),
        enrichment,
        enrichment_missing,
    }
}

/// Dispatch the event, waiting a bounded time for the outcome. If delivery
/// is still in flight when the wait runs out, the task keeps running
/// detached and the response just says so.
async fn notify(state: &SharedState, reception: &Reception, warnings: &mut Vec<String>) {
    let event = ReceptionEvent::from_reception(reception);
    let notifier = state.notifier.clone();
    let wait_secs = state
        .config
        .webhook
        .as_ref()
        .map(|w| w.wait_before_return_secs)
        .unwrap_or(6);

    let handle = tokio::spawn(async move { notifier.notify(&event).await });

    match tokio::time::timeout(Duration::from_secs(wait_secs), handle).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => {
            tracing::warn!("Notification delivery failed: {e}");
            warnings.push(format!("notification delivery failed: {e}"));
        }
        Ok(Err(e)) => {
            tracing::error!("Notification task failed: {e}");
            warnings.push("notification delivery failed".to_string());
        }
        Err(_) => {
            tracing::info!("Notification still in flight after {wait_secs}s; detaching");
            warnings.push(format!(
                "notification still in flight after {wait_secs}s; continuing in background"
            ));
        }
    }
}
