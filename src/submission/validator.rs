use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::Category;

/// A validated submission, tagged by category. Each variant carries the
/// fields its category requires; everything optional lives in
/// [`FormDetails`]. Unknown extra fields in the payload are ignored.
#[derive(Debug, Clone)]
pub enum SubmissionForm {
    Samples(SamplesForm),
    Other(OtherForm),
}

/// "Samples" reception: keyed to a task on the board.
#[derive(Debug, Clone)]
pub struct SamplesForm {
    pub task_id: String,
    pub item_name: String,
    pub quantity: String,
    pub details: FormDetails,
}

/// Generic "other" reception: packages, consumables, anything without a
/// sample task behind it.
#[derive(Debug, Clone)]
pub struct OtherForm {
    pub item_name: String,
    pub order_id: Option<String>,
    pub quantity: Option<String>,
    pub details: FormDetails,
}

#[derive(Debug, Clone, Default)]
pub struct FormDetails {
    pub supplier: Option<String>,
    pub item_type: Option<String>,
    pub project_manager: Option<String>,
    pub bsl2: bool,
    pub client: Option<String>,
    pub package_status: Option<String>,
    pub storage_location: Option<String>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub lot_number: Option<String>,
    pub catalog_number: Option<String>,
    pub received_by: Option<String>,
    pub received_by_id: Option<String>,
    pub comments: Option<String>,
    /// Client-supplied reception time; the pipeline falls back to now().
    pub received_at: Option<DateTime<Utc>>,
}

impl SubmissionForm {
    pub fn category(&self) -> Category {
        match self {
            SubmissionForm::Samples(_) => Category::Samples,
            SubmissionForm::Other(_) => Category::Other,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            SubmissionForm::Samples(f) => &f.item_name,
            SubmissionForm::Other(f) => &f.item_name,
        }
    }

    /// The external identifier the submission points at, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            SubmissionForm::Samples(f) => Some(&f.task_id),
            SubmissionForm::Other(f) => f.order_id.as_deref(),
        }
    }

    pub fn quantity(&self) -> Option<&str> {
        match self {
            SubmissionForm::Samples(f) => Some(&f.quantity),
            SubmissionForm::Other(f) => f.quantity.as_deref(),
        }
    }

    pub fn details(&self) -> &FormDetails {
        match self {
            SubmissionForm::Samples(f) => &f.details,
            SubmissionForm::Other(f) => &f.details,
        }
    }
}

/// Validate a raw payload into a [`SubmissionForm`]. Pure and
/// deterministic; all problems are collected and reported together.
pub fn validate(raw: &Value) -> Result<SubmissionForm, Vec<String>> {
    let Some(obj) = raw.as_object() else {
        return Err(vec!["Payload must be a JSON object".to_string()]);
    };

    let mut errors = Vec::new();

    let category = match obj.get("form_type") {
        None | Some(Value::Null) => {
            errors.push("Missing required field: form_type".to_string());
            None
        }
        Some(v) => {
            let s = string_of(v).unwrap_or_default();
            match Category::parse(&s) {
                Some(c) => Some(c),
                None => {
                    errors.push(format!(
                        "Unknown form_type: {s:?} (expected \"samples\" or \"other\")"
                    ));
                    None
                }
            }
        }
    };

    let field = |name: &str| obj.get(name).and_then(string_of);
    let mut required = |name: &str| -> String {
        match field(name) {
            Some(v) => v,
            None => {
                errors.push(format!("Missing required field: {name}"));
                String::new()
            }
        }
    };

    let (task_id, order_id, item_name, quantity) = match category {
        Some(Category::Samples) => {
            let task_id = required("task_id");
            let item_name = required("item_name");
            let quantity = required("quantity");
            (Some(task_id), None, item_name, Some(quantity))
        }
        Some(Category::Other) => {
            let item_name = required("item_name");
            (None, field("order_id"), item_name, field("quantity"))
        }
        None => (None, None, String::new(), None),
    };

    let received_at = match obj.get("timestamp").and_then(string_of) {
        Some(ts) => match parse_timestamp(&ts) {
            Some(dt) => Some(dt),
            None => {
                errors.push(format!("Invalid timestamp: {ts:?}"));
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let details = FormDetails {
        supplier: field("supplier"),
        item_type: field("item_type"),
        project_manager: field("project_manager"),
        bsl2: parse_bsl2(obj.get("bsl2"), obj.get("bsl2_status")),
        client: field("client"),
        package_status: field("package_status"),
        storage_location: field("storage_location"),
        location: field("location"),
        sub_location: field("sub_location").or_else(|| obj.get("sub-location").and_then(string_of)),
        lot_number: field("lot_number"),
        catalog_number: field("catalog_number"),
        received_by: field("received_by"),
        received_by_id: field("received_by_id"),
        comments: field("comments"),
        received_at,
    };

    Ok(match category {
        Some(Category::Samples) => SubmissionForm::Samples(SamplesForm {
            task_id: task_id.unwrap(),
            item_name,
            quantity: quantity.unwrap(),
            details,
        }),
        Some(Category::Other) => SubmissionForm::Other(OtherForm {
            item_name,
            order_id,
            quantity,
            details,
        }),
        None => unreachable!("category errors already returned"),
    })
}

/// Non-empty trimmed string from a JSON value; numbers are coerced since
/// form fields arrive as either.
fn string_of(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

/// Accept the boolean field or the legacy checkbox string.
fn parse_bsl2(bsl2: Option<&Value>, bsl2_status: Option<&Value>) -> bool {
    match bsl2 {
        Some(Value::Bool(b)) => return *b,
        Some(Value::Number(n)) => return n.as_i64() == Some(1),
        Some(Value::String(s)) => return truthy(s),
        _ => {}
    }
    match bsl2_status {
        Some(Value::String(s)) => truthy(s),
        _ => false,
    }
}

fn truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "checked"
    )
}

/// RFC 3339, or a bare ISO 8601 local time treated as UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let s = s.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
