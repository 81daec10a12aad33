//! Chart-ready structures handed to a chart engine.

use serde::Serialize;

use super::{ChartError, ChartHandle};
use crate::normalize::{MovementTrend, NormalizedSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

/// One named series aligned to [`ChartSpec::labels`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    /// Build a chart from every series of a normalized payload
    pub fn from_normalized(title: impl Into<String>, data: &NormalizedSeries) -> Self {
        let series = data
            .series_names()
            .iter()
            .filter_map(|name| {
                data.column(name).map(|values| SeriesSpec {
                    name: name.clone(),
                    values,
                })
            })
            .collect();

        Self {
            title: title.into(),
            kind: ChartKind::Bar,
            labels: data.labels().to_vec(),
            series,
        }
    }

    /// Movement chart: entries, exits and the locally computed net series
    pub fn from_movement(title: impl Into<String>, trend: &MovementTrend) -> Self {
        let mut spec = Self::from_normalized(title, &trend.series);
        spec.series.push(SeriesSpec {
            name: "net_movement".to_string(),
            values: trend.net_movement.clone(),
        });
        spec
    }

    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.series.iter().all(|s| s.values.is_empty())
    }

    /// Largest absolute value across all series (0 when empty)
    pub fn max_abs_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// External chart-drawing library, reduced to the operations the dashboard
/// needs: render a spec into a slot, producing a destroyable handle.
pub trait ChartEngine {
    type Handle: ChartHandle;

    fn render(&mut self, slot: &str, spec: &ChartSpec) -> Result<Self::Handle, ChartError>;
}
