//! Payload normalization
//!
//! Raw analytics payloads carry index-aligned arrays: `labels` ("MM/YYYY"
//! period identifiers) plus one or more numeric series. Normalization turns
//! them into a label-keyed lookup, silently dropping every index whose label
//! fails validation. Nothing here returns an error: partial or evolving
//! payloads are expected.

mod movement;

#[cfg(test)]
mod normalize_tests;

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

pub use cartera_types::LabelPolicy;
pub use movement::{MOVEMENT_NOTE, MOVEMENT_SERIES, MovementTrend, normalize_movement};

/// Key of the label array in every payload
pub const LABELS_KEY: &str = "labels";

static PERIOD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})/([0-9]{4})$").expect("period label pattern"));

/// Check a period label against `policy`.
pub fn is_valid_label(label: &str, policy: LabelPolicy) -> bool {
    let Some(caps) = PERIOD_LABEL.captures(label) else {
        return false;
    };
    match policy {
        LabelPolicy::Shape => true,
        LabelPolicy::Calendar => caps[1]
            .parse::<u8>()
            .is_ok_and(|month| (1..=12).contains(&month)),
    }
}

/// Label-keyed values built from index-aligned payload arrays.
///
/// Every label present passed validation. Values for a label are stored in
/// the order of the series keys given to [`normalize_series`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedSeries {
    series: Vec<String>,
    labels: Vec<String>,
    values: HashMap<String, Vec<f64>>,
}

impl NormalizedSeries {
    /// Series names, in column order
    pub fn series_names(&self) -> &[String] {
        &self.series
    }

    /// Validated labels in first-seen payload order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    /// All series values for one label
    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.values.get(label).map(Vec::as_slice)
    }

    /// Value of one series at one label
    pub fn value(&self, series: &str, label: &str) -> Option<f64> {
        let col = self.series.iter().position(|s| s == series)?;
        self.values.get(label).and_then(|v| v.get(col).copied())
    }

    /// One series as a label -> value mapping
    pub fn series(&self, name: &str) -> Option<BTreeMap<&str, f64>> {
        let col = self.series.iter().position(|s| s == name)?;
        Some(
            self.values
                .iter()
                .map(|(label, vals)| (label.as_str(), vals[col]))
                .collect(),
        )
    }

    /// One series as values aligned to [`labels`](Self::labels)
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let col = self.series.iter().position(|s| s == name)?;
        Some(
            self.labels
                .iter()
                .map(|label| self.values[label][col])
                .collect(),
        )
    }
}

/// Normalize a raw payload.
///
/// `labels` and each series default to empty when absent or not arrays.
/// Indices whose label fails [`is_valid_label`] are skipped for every series.
/// Retained values are coerced with [`coerce_number`]; a series shorter than
/// `labels` contributes 0 for the missing indices. A repeated label keeps its
/// first position and takes the later values.
pub fn normalize_series(
    payload: &Value,
    series_keys: &[&str],
    policy: LabelPolicy,
) -> NormalizedSeries {
    let labels = array_field(payload, LABELS_KEY);
    let columns: Vec<&[Value]> = series_keys
        .iter()
        .map(|key| array_field(payload, key))
        .collect();

    let mut out = NormalizedSeries {
        series: series_keys.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };

    for (idx, raw_label) in labels.iter().enumerate() {
        let Some(label) = raw_label.as_str().filter(|l| is_valid_label(l, policy)) else {
            trace!(idx, label = %raw_label, "dropping payload index with invalid label");
            continue;
        };

        let row: Vec<f64> = columns
            .iter()
            .map(|col| col.get(idx).map(coerce_number).unwrap_or(0.0))
            .collect();

        if out.values.insert(label.to_string(), row).is_none() {
            out.labels.push(label.to_string());
        }
    }

    out
}

/// Names of every array field except `labels`, sorted
pub fn series_keys(payload: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = payload
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, v)| k.as_str() != LABELS_KEY && v.is_array())
                .map(|(k, _)| k.as_str())
                .collect()
        })
        .unwrap_or_default();
    keys.sort_unstable();
    keys
}

/// Normalize every array field of a payload whose shape is not known ahead
/// of time (see [`series_keys`]).
pub fn normalize_payload(payload: &Value, policy: LabelPolicy) -> NormalizedSeries {
    normalize_series(payload, &series_keys(payload), policy)
}

/// Array-typed field of a payload, or an empty slice
fn array_field<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Coerce a JSON value to a finite number, defaulting to 0.
///
/// Numbers pass through; numeric strings are parsed; everything else
/// (null, booleans, containers, non-finite results) becomes 0.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite()).unwrap_or(0.0)
}
