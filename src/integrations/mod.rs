pub mod clickup;
pub mod webhook;

use async_trait::async_trait;

use crate::models::{Category, MetadataOption, ReceptionEvent};

/// The upstream could not answer: timeout, connection failure, non-2xx, or
/// a body that did not parse. A category with zero options is NOT this;
/// that is an `Ok(vec![])`.
#[derive(Debug)]
pub struct LookupError {
    pub message: String,
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for LookupError {
    fn from(s: String) -> Self {
        LookupError { message: s }
    }
}

impl From<&str> for LookupError {
    fn from(s: &str) -> Self {
        LookupError {
            message: s.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct NotifyError {
    pub message: String,
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for NotifyError {
    fn from(s: String) -> Self {
        NotifyError { message: s }
    }
}

impl From<&str> for NotifyError {
    fn from(s: &str) -> Self {
        NotifyError {
            message: s.to_string(),
        }
    }
}

/// Read-only metadata lookup against the task board. One bounded HTTP call
/// per invocation; no caching, no retries at this layer.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// False for the disabled stand-in; the pipeline skips enrichment
    /// entirely instead of flagging records it could never enrich.
    fn enabled(&self) -> bool {
        true
    }

    /// All candidate options for a category. `Ok(vec![])` when the category
    /// legitimately has none.
    async fn fetch_options(&self, category: Category)
        -> Result<Vec<MetadataOption>, LookupError>;

    /// Resolve one reference (task id) to its option. `Ok(None)` when the
    /// upstream does not know it.
    async fn resolve(
        &self,
        category: Category,
        reference: &str,
    ) -> Result<Option<MetadataOption>, LookupError>;
}

/// Posts a reception event to the automation webhook.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &ReceptionEvent) -> Result<(), NotifyError>;
}

/// Stand-in when the lookup integration is disabled. Never fails.
pub struct NoopLookup;

#[async_trait]
impl MetadataLookup for NoopLookup {
    fn enabled(&self) -> bool {
        false
    }

    async fn fetch_options(
        &self,
        _category: Category,
    ) -> Result<Vec<MetadataOption>, LookupError> {
        Ok(Vec::new())
    }

    async fn resolve(
        &self,
        _category: Category,
        _reference: &str,
    ) -> Result<Option<MetadataOption>, LookupError> {
        Ok(None)
    }
}

/// Stand-in when the webhook integration is disabled. Never fails.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _event: &ReceptionEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}
