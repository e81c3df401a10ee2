use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClickUpConfig;
use crate::models::{Category, MetadataOption};

use super::{LookupError, MetadataLookup};

/// Read-only client for the ClickUp task board. The reception list holds
/// the sample tasks staff pick from; "other" receptions have no board, so
/// that category always resolves to zero options.
pub struct ClickUpClient {
    client: reqwest::Client,
    config: ClickUpConfig,
}

impl ClickUpClient {
    pub fn new(config: ClickUpConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to build reqwest client"),
            config,
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, LookupError> {
        let resp = self
            .client
            .get(url)
            .header("Authorization", &self.config.api_token)
            .send()
            .await
            .map_err(|e| LookupError::from(format!("ClickUp request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::from(format!(
                "ClickUp returned HTTP {status}"
            )));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| LookupError::from(format!("ClickUp sent a malformed body: {e}")))
    }

    fn option_from_task(&self, task: &Value) -> MetadataOption {
        let custom_fields = task
            .get("custom_fields")
            .and_then(|v| v.as_array())
            .map(|a| a.as_slice())
            .unwrap_or(&[]);
        let (project_manager, project_manager_id, bsl2) = self.extract_task_meta(custom_fields);

        MetadataOption {
            id: task
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            label: task
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            status: task
                .pointer("/status/status")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            project_manager,
            project_manager_id,
            bsl2,
        }
    }

    /// Pull the project manager and BSL-2 flag out of a task's custom
    /// fields. The PM field is matched by configured id first, then by a
    /// field named like "Project Manager"; people fields come back as
    /// objects or one-element arrays depending on the board setup.
    fn extract_task_meta(
        &self,
        custom_fields: &[Value],
    ) -> (Option<String>, Option<String>, bool) {
        let mut pm_name: Option<String> = None;
        let mut pm_id: Option<String> = None;
        let mut bsl2 = false;

        let person_from = |val: &Value| -> (Option<String>, Option<String>) {
            let obj = match val {
                Value::Array(items) => items.first(),
                other => Some(other),
            };
            match obj {
                Some(Value::Object(map)) => {
                    let id = map
                        .get("id")
                        .map(|v| match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .or_else(|| map.get("value").and_then(|v| v.as_str()).map(String::from));
                    let name = map
                        .get("name")
                        .or_else(|| map.get("username"))
                        .and_then(|v| v.as_str())
                        .map(String::from);
                    (name, id)
                }
                Some(Value::String(s)) => (Some(s.clone()), None),
                _ => (None, None),
            }
        };

        for cf in custom_fields {
            let cf_id = cf.get("id").and_then(|v| v.as_str()).unwrap_or("");
            let val = match cf.get("value") {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };

            if Some(cf_id) == self.config.cf_project_manager_id.as_deref() {
                let (name, id) = person_from(val);
                pm_name = name.or(pm_name);
                pm_id = id.or(pm_id);
            }

            if cf_id == self.config.cf_bsl2_checkbox_id {
                bsl2 = match val {
                    Value::Bool(b) => *b,
                    Value::Number(n) => n.as_i64() == Some(1),
                    Value::String(s) => {
                        matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "y")
                    }
                    _ => false,
                };
            }
        }

        // Fall back to matching the field by name when no id is configured.
        if pm_name.is_none() {
            for cf in custom_fields {
                let name_lower = cf
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if name_lower.contains("project") && name_lower.contains("manager") {
                    if let Some(val) = cf.get("value").filter(|v| !v.is_null()) {
                        let (name, id) = person_from(val);
                        pm_name = name;
                        pm_id = pm_id.or(id);
                    }
                    break;
                }
            }
        }

        (pm_name, pm_id, bsl2)
    }
}

#[async_trait]
impl MetadataLookup for ClickUpClient {
    async fn fetch_options(
        &self,
        category: Category,
    ) -> Result<Vec<MetadataOption>, LookupError> {
        if category != Category::Samples {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/list/{}/task",
            self.config.api_base, self.config.list_id
        );
        let body = self.get_json(&url).await?;

        let tasks = body
            .get("tasks")
            .and_then(|v| v.as_array())
            .ok_or_else(|| LookupError::from("ClickUp task list had no `tasks` array"))?;

        let options = tasks
            .iter()
            .map(|t| self.option_from_task(t))
            .filter(|opt| {
                self.config.status_filter.is_empty()
                    || opt
                        .status
                        .as_deref()
                        .is_some_and(|s| {
                            self.config
                                .status_filter
                                .iter()
                                .any(|f| f.eq_ignore_ascii_case(s))
                        })
            })
            .collect();

        Ok(options)
    }

    async fn resolve(
        &self,
        category: Category,
        reference: &str,
    ) -> Result<Option<MetadataOption>, LookupError> {
        if category != Category::Samples {
            return Ok(None);
        }

        let url = format!("{}/task/{}", self.config.api_base, reference);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.config.api_token)
            .send()
            .await
            .map_err(|e| LookupError::from(format!("ClickUp request failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::from(format!(
                "ClickUp returned HTTP {status}"
            )));
        }

        let task = resp
            .json::<Value>()
            .await
            .map_err(|e| LookupError::from(format!("ClickUp sent a malformed body: {e}")))?;

        Ok(Some(self.option_from_task(&task)))
    }
}
