use serde_json::json;

use labintake::models::Category;
use labintake::submission::validator::{validate, SubmissionForm};

#[test]
fn samples_requires_task_id_item_name_and_quantity() {
    let err = validate(&json!({ "form_type": "samples" })).unwrap_err();
    assert_eq!(err.len(), 3);
    assert!(err.iter().any(|e| e.contains("task_id")));
    assert!(err.iter().any(|e| e.contains("item_name")));
    assert!(err.iter().any(|e| e.contains("quantity")));
}

#[test]
fn empty_strings_do_not_satisfy_required_fields() {
    let err = validate(&json!({
        "form_type": "samples",
        "task_id": "  ",
        "item_name": "",
        "quantity": "3",
    }))
    .unwrap_err();
    assert!(err.iter().any(|e| e.contains("task_id")));
    assert!(err.iter().any(|e| e.contains("item_name")));
    assert!(!err.iter().any(|e| e.contains("quantity")));
}

#[test]
fn valid_samples_payload_produces_samples_form() {
    let form = validate(&json!({
        "form_type": "samples",
        "task_id": "861m1",
        "item_name": "Test Sample",
        "quantity": 10,
        "supplier": "LabCorp",
        "unexpected_field": "ignored",
    }))
    .unwrap();

    assert_eq!(form.category(), Category::Samples);
    assert_eq!(form.reference(), Some("861m1"));
    // Numeric quantity is coerced to its string form
    assert_eq!(form.quantity(), Some("10"));
    let SubmissionForm::Samples(samples) = form else {
        panic!("expected samples variant");
    };
    assert_eq!(samples.item_name, "Test Sample");
    assert_eq!(samples.details.supplier.as_deref(), Some("LabCorp"));
}

#[test]
fn other_needs_only_item_name() {
    let form = validate(&json!({ "form_type": "other", "item_name": "Buffer" })).unwrap();
    assert_eq!(form.category(), Category::Other);
    assert_eq!(form.reference(), None);
    assert_eq!(form.quantity(), None);
}

#[test]
fn other_carries_order_id_as_reference() {
    let form = validate(&json!({
        "form_type": "other",
        "item_name": "Buffer",
        "order_id": "QO-123",
    }))
    .unwrap();
    assert_eq!(form.reference(), Some("QO-123"));
}

#[test]
fn form_type_is_case_insensitive() {
    let form = validate(&json!({ "form_type": "Samples", "task_id": "t", "item_name": "x", "quantity": "1" }))
        .unwrap();
    assert_eq!(form.category(), Category::Samples);
}

#[test]
fn missing_form_type_is_an_error() {
    let err = validate(&json!({ "item_name": "Box" })).unwrap_err();
    assert!(err[0].contains("form_type"));
}

#[test]
fn unknown_form_type_is_an_error() {
    let err = validate(&json!({ "form_type": "misc", "item_name": "Box" })).unwrap_err();
    assert!(err[0].contains("misc"));
}

#[test]
fn non_object_payload_is_an_error() {
    assert!(validate(&json!("just a string")).is_err());
    assert!(validate(&json!([1, 2, 3])).is_err());
}

#[test]
fn bsl2_accepts_bool_and_legacy_checkbox_strings() {
    let base = json!({ "form_type": "other", "item_name": "Box" });

    let with = |key: &str, value: serde_json::Value| {
        let mut payload = base.clone();
        payload[key] = value;
        validate(&payload).unwrap()
    };

    assert!(with("bsl2", json!(true)).details().bsl2);
    assert!(!with("bsl2", json!(false)).details().bsl2);
    assert!(with("bsl2", json!("checked")).details().bsl2);
    assert!(with("bsl2", json!("YES")).details().bsl2);
    assert!(!with("bsl2", json!("nope")).details().bsl2);
    assert!(with("bsl2_status", json!("y")).details().bsl2);
    assert!(!validate(&base).unwrap().details().bsl2);
}

#[test]
fn timestamp_accepts_rfc3339_and_bare_iso() {
    let rfc = validate(&json!({
        "form_type": "other",
        "item_name": "Box",
        "timestamp": "2026-03-01T09:30:00+02:00",
    }))
    .unwrap();
    let ts = rfc.details().received_at.unwrap();
    assert_eq!(ts.to_rfc3339(), "2026-03-01T07:30:00+00:00");

    let bare = validate(&json!({
        "form_type": "other",
        "item_name": "Box",
        "timestamp": "2026-03-01T09:30:00.250",
    }))
    .unwrap();
    assert!(bare.details().received_at.is_some());
}

#[test]
fn bad_timestamp_is_an_error() {
    let err = validate(&json!({
        "form_type": "other",
        "item_name": "Box",
        "timestamp": "yesterday-ish",
    }))
    .unwrap_err();
    assert!(err[0].contains("timestamp") || err[0].contains("Invalid"));
}

#[test]
fn sub_location_accepts_legacy_hyphenated_key() {
    let form = validate(&json!({
        "form_type": "other",
        "item_name": "Box",
        "sub-location": "Glass Door 4°C",
    }))
    .unwrap();
    assert_eq!(form.details().sub_location.as_deref(), Some("Glass Door 4°C"));
}
