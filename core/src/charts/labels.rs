//! Value label layout
//!
//! Candidates are placed in priority order. A candidate is accepted when it
//! overlaps no previously accepted label and no fixed anchor; otherwise it is
//! nudged upward and retested a bounded number of times, then skipped. The
//! result depends only on the input order and geometry.

use serde::Serialize;

use super::ChartSpec;
use crate::geometry::{LabelBox, LabelBoxExt};
use cartera_types::AppConfig;

/// A label that wants to be drawn at `bbox`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCandidate {
    pub text: String,
    pub bbox: LabelBox,
    /// Higher is placed first by [`by_priority`]
    pub priority: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Placement {
    Placed {
        text: String,
        bbox: LabelBox,
        nudges: u8,
    },
    Skipped {
        text: String,
    },
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed { .. })
    }

    pub fn bbox(&self) -> Option<&LabelBox> {
        match self {
            Placement::Placed { bbox, .. } => Some(bbox),
            Placement::Skipped { .. } => None,
        }
    }
}

/// Placement parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    /// Overlap tolerance; `None` uses the geometry default
    pub padding: Option<f64>,
    pub max_nudges: u8,
    /// Extra gap added to the label height on each upward nudge
    pub nudge_step: f64,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            padding: None,
            max_nudges: 3,
            nudge_step: 2.0,
        }
    }
}

impl LabelLayout {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            padding: Some(config.label_padding),
            max_nudges: config.label_max_nudges,
            nudge_step: config.label_nudge_step,
        }
    }

    /// Place candidates in the given order, avoiding accepted labels and
    /// `anchors`. Output has one entry per candidate, in input order.
    pub fn place(&self, candidates: &[LabelCandidate], anchors: &[LabelBox]) -> Vec<Placement> {
        let mut accepted: Vec<LabelBox> = Vec::with_capacity(candidates.len());
        let mut out = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.find_position(&candidate.bbox, &accepted, anchors) {
                Some((bbox, nudges)) => {
                    accepted.push(bbox);
                    out.push(Placement::Placed {
                        text: candidate.text.clone(),
                        bbox,
                        nudges,
                    });
                }
                None => out.push(Placement::Skipped {
                    text: candidate.text.clone(),
                }),
            }
        }
        out
    }

    fn find_position(
        &self,
        start: &LabelBox,
        accepted: &[LabelBox],
        anchors: &[LabelBox],
    ) -> Option<(LabelBox, u8)> {
        let step = start.height() + self.nudge_step.max(0.0);
        let mut bbox = *start;
        for nudges in 0..=self.max_nudges {
            let blocked = bbox.overlaps_any(accepted, self.padding)
                || bbox.overlaps_any(anchors, self.padding);
            if !blocked {
                return Some((bbox, nudges));
            }
            bbox = bbox.translate(0.0, -step);
        }
        None
    }
}

/// Sort candidates by descending priority; ties keep their original order.
pub fn by_priority(candidates: &mut [LabelCandidate]) {
    candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));
}

// ─────────────────────────────────────────────────────────────────────────────
// Value Labels
// ─────────────────────────────────────────────────────────────────────────────

/// Pixel frame a chart is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Average glyph advance used to estimate label width
    pub glyph_width: f64,
    pub line_height: f64,
}

impl ChartFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: 24.0,
            glyph_width: 7.0,
            line_height: 12.0,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.chart_width as f64, config.chart_height as f64)
    }

    fn plot_width(&self) -> f64 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - 2.0 * self.margin).max(0.0)
    }

    /// Box reserved for the chart title, usable as a layout anchor
    pub fn title_box(&self, title: &str) -> LabelBox {
        let w = title.chars().count() as f64 * self.glyph_width;
        LabelBox::from_origin((self.width - w) / 2.0, 0.0, w, self.line_height)
    }
}

/// One value label per data point, sitting just above its bar.
///
/// Bars for a label share one band of the plot width; each series takes an
/// equal slice of the band. Priority is the absolute value, so the largest
/// values win contested space once sorted with [`by_priority`].
pub fn value_label_candidates(spec: &ChartSpec, frame: &ChartFrame) -> Vec<LabelCandidate> {
    let n_labels = spec.labels.len();
    let n_series = spec.series.len();
    if n_labels == 0 || n_series == 0 {
        return Vec::new();
    }

    let max = spec.max_abs_value();
    let band = frame.plot_width() / n_labels as f64;
    let slot = band / n_series as f64;
    let baseline = frame.height - frame.margin;

    let mut out = Vec::with_capacity(n_labels * n_series);
    for (s_idx, series) in spec.series.iter().enumerate() {
        for (l_idx, value) in series.values.iter().take(n_labels).enumerate() {
            let ratio = if max > 0.0 { value.abs() / max } else { 0.0 };
            let bar_top = baseline - ratio * frame.plot_height();
            let center_x = frame.margin + l_idx as f64 * band + (s_idx as f64 + 0.5) * slot;

            let text = format_value(*value);
            let w = text.chars().count() as f64 * frame.glyph_width;
            let h = frame.line_height;
            out.push(LabelCandidate {
                bbox: LabelBox::from_origin(center_x - w / 2.0, bar_top - h - 2.0, w, h),
                text,
                priority: value.abs(),
            });
        }
    }
    out
}

/// Format a value with K/M suffix for compact display
pub fn format_value(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
