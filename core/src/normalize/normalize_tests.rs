//! Tests for payload normalization
//!
//! Label validation, index alignment and value coercion.

use serde_json::json;

use super::*;

#[test]
fn test_malformed_labels_dropped() {
    let payload = json!({
        "labels": ["13/2024", "03/2024", "bad", ""],
        "value": [5, 7, 9, 11],
    });
    let out = normalize_series(&payload, &["value"], LabelPolicy::Calendar);

    let series = out.series("value").unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.get("03/2024"), Some(&7.0));
    assert_eq!(out.labels(), ["03/2024".to_string()]);
}

#[test]
fn test_shape_policy_keeps_out_of_range_month() {
    let payload = json!({
        "labels": ["13/2024", "03/2024", "bad", ""],
        "value": [5, 7, 9, 11],
    });
    let out = normalize_series(&payload, &["value"], LabelPolicy::Shape);
    assert_eq!(out.value("value", "13/2024"), Some(5.0));
    assert_eq!(out.value("value", "03/2024"), Some(7.0));
    assert_eq!(out.len(), 2);
}

#[test]
fn test_label_shape_rules() {
    for ok in ["01/2024", "12/1999"] {
        assert!(is_valid_label(ok, LabelPolicy::Calendar), "{ok}");
    }
    for bad in ["1/2024", "01/24", "01-2024", " 01/2024", "01/2024 ", "00/2024", "ab/cdef"] {
        assert!(!is_valid_label(bad, LabelPolicy::Calendar), "{bad}");
    }
    assert!(is_valid_label("00/2024", LabelPolicy::Shape));
    // non-ASCII digits are not digits here
    assert!(!is_valid_label("٠١/٢٠٢٤", LabelPolicy::Shape));
}

#[test]
fn test_missing_and_non_array_fields_default_to_empty() {
    assert!(normalize_series(&json!({}), &["a"], LabelPolicy::Calendar).is_empty());
    assert!(normalize_series(&json!(null), &["a"], LabelPolicy::Calendar).is_empty());
    assert!(normalize_series(&json!({"labels": "01/2024"}), &["a"], LabelPolicy::Calendar).is_empty());

    let out = normalize_series(
        &json!({"labels": ["01/2024"], "a": {"0": 4}}),
        &["a"],
        LabelPolicy::Calendar,
    );
    assert_eq!(out.get("01/2024"), Some(&[0.0][..]));
}

#[test]
fn test_values_coerced_and_short_series_padded() {
    let payload = json!({
        "labels": ["01/2024", "02/2024", "03/2024", "04/2024"],
        "a": [1.5, "2.25", null, "x"],
        "b": [10],
    });
    let out = normalize_series(&payload, &["a", "b"], LabelPolicy::Calendar);
    assert_eq!(out.column("a").unwrap(), vec![1.5, 2.25, 0.0, 0.0]);
    assert_eq!(out.column("b").unwrap(), vec![10.0, 0.0, 0.0, 0.0]);
    assert_eq!(out.get("01/2024"), Some(&[1.5, 10.0][..]));
    assert_eq!(out.series_names(), ["a".to_string(), "b".to_string()]);
}

#[test]
fn test_non_string_labels_dropped() {
    let payload = json!({"labels": [202401, null, "02/2024"], "a": [1, 2, 3]});
    let out = normalize_series(&payload, &["a"], LabelPolicy::Calendar);
    assert_eq!(out.labels(), ["02/2024".to_string()]);
    assert_eq!(out.value("a", "02/2024"), Some(3.0));
}

#[test]
fn test_duplicate_label_keeps_first_position_last_values() {
    let payload = json!({"labels": ["01/2024", "02/2024", "01/2024"], "a": [1, 2, 3]});
    let out = normalize_series(&payload, &["a"], LabelPolicy::Calendar);
    assert_eq!(out.labels(), ["01/2024".to_string(), "02/2024".to_string()]);
    assert_eq!(out.column("a").unwrap(), vec![3.0, 2.0]);
}

#[test]
fn test_coerce_number() {
    assert_eq!(coerce_number(&json!(3)), 3.0);
    assert_eq!(coerce_number(&json!(" 4.5 ")), 4.5);
    assert_eq!(coerce_number(&json!(true)), 0.0);
    assert_eq!(coerce_number(&json!("NaN")), 0.0);
    assert_eq!(coerce_number(&json!("inf")), 0.0);
    assert_eq!(coerce_number(&json!([1])), 0.0);
}

#[test]
fn test_movement_trend_metadata_and_net() {
    let payload = json!({
        "labels": ["01/2024", "bad", "02/2024"],
        "to_moroso": [10, 99, 4],
        "from_moroso": [3, 99, 6],
        "moroso_rate": [0.12, 0.5, 0.1],
    });
    let trend = normalize_movement(&payload, LabelPolicy::Calendar);
    assert!(trend.available);
    assert_eq!(trend.note, MOVEMENT_NOTE);
    assert_eq!(trend.labels(), ["01/2024".to_string(), "02/2024".to_string()]);
    assert_eq!(trend.net_movement, vec![7.0, -2.0]);
    assert_eq!(trend.series.value("moroso_rate", "02/2024"), Some(0.1));
}

#[test]
fn test_movement_trend_on_empty_payload_is_still_available() {
    let trend = normalize_movement(&json!({}), LabelPolicy::Calendar);
    assert!(trend.available);
    assert!(trend.labels().is_empty());
    assert!(trend.net_movement.is_empty());
}

#[test]
fn test_normalize_payload_discovers_series() {
    let payload = json!({
        "labels": ["01/2024", "02/2024"],
        "saldo": [100, 120],
        "cuentas": [4, "5"],
        "title": "Cartera",
        "meta": {"rows": 2},
    });
    assert_eq!(series_keys(&payload), vec!["cuentas", "saldo"]);

    let out = normalize_payload(&payload, LabelPolicy::Calendar);
    assert_eq!(out.series_names(), ["cuentas".to_string(), "saldo".to_string()]);
    assert_eq!(out.get("02/2024"), Some(&[5.0, 120.0][..]));
}
