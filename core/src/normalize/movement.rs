//! Moroso (delinquency) movement trend payload.

use serde::Serialize;
use serde_json::Value;

use super::{LabelPolicy, NormalizedSeries, normalize_series};

/// Series carried by the movement trend endpoint, in column order
pub const MOVEMENT_SERIES: [&str; 3] = ["to_moroso", "from_moroso", "moroso_rate"];

/// Fixed explanatory text shown next to the locally computed series
pub const MOVEMENT_NOTE: &str = "Net movement is computed locally as entries into \
    moroso minus exits from moroso for each management month.";

/// Chart-ready movement trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementTrend {
    pub series: NormalizedSeries,
    /// Entries minus exits per label, aligned to `series.labels()`
    pub net_movement: Vec<f64>,
    pub available: bool,
    pub note: &'static str,
}

impl MovementTrend {
    pub fn labels(&self) -> &[String] {
        self.series.labels()
    }
}

/// Normalize a moroso-trend payload and derive the net movement series.
pub fn normalize_movement(payload: &Value, policy: LabelPolicy) -> MovementTrend {
    let series = normalize_series(payload, &MOVEMENT_SERIES, policy);
    let net_movement = series
        .labels()
        .iter()
        .filter_map(|label| series.get(label))
        .map(|row| row[0] - row[1])
        .collect();

    MovementTrend {
        series,
        net_movement,
        available: true,
        note: MOVEMENT_NOTE,
    }
}
