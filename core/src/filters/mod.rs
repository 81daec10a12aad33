//! Filter selection state and its canonical signature.
//!
//! The signature is the cache key for everything fetched under a selection:
//! two selections with the same group -> value-set content always produce the
//! same signature, whatever order groups or values were added in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use cartera_types::{FilterGroup, FilterSelection, UnknownFilterGroup};

/// Deterministic digest of a [`FilterSelection`]'s content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSignature(String);

impl FilterSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FilterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the canonical signature of a selection.
///
/// Groups are keyed by identifier and sorted; values are sorted within each
/// group; the ordered structure is encoded as compact JSON. Groups without
/// values are left out, so an empty selection encodes as `{}`.
pub fn signature(selection: &FilterSelection) -> FilterSignature {
    let canonical: BTreeMap<&str, Vec<&str>> = selection
        .iter()
        .map(|(group, _)| (group.id(), selection.sorted_values(group)))
        .collect();

    // A map of strings to string arrays always serializes
    let encoded = serde_json::to_string(&canonical).unwrap_or_else(|_| "{}".to_string());
    FilterSignature(encoded)
}

/// Extension trait giving selections direct access to their signature
pub trait FilterSelectionExt {
    fn signature(&self) -> FilterSignature;
}

impl FilterSelectionExt for FilterSelection {
    fn signature(&self) -> FilterSignature {
        signature(self)
    }
}
