//! Terminal chart engine
//!
//! Draws a [`ChartSpec`] as horizontal bars. Value labels go through the
//! label layout first; a value whose label was skipped is drawn without
//! its number.

use cartera_core::charts::labels::{
    ChartFrame, LabelCandidate, format_value, value_label_candidates,
};
use cartera_core::charts::{ChartEngine, ChartError, ChartHandle, ChartSpec, LabelLayout};
use cartera_types::AppConfig;
use tracing::debug;

const BAR_WIDTH: usize = 40;

/// A chart drawn to the terminal. Destroying it twice is an error.
#[derive(Debug)]
pub struct TextChart {
    slot: String,
    lines: Vec<String>,
    placed: usize,
    skipped: usize,
    live: bool,
}

impl TextChart {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn placed_labels(&self) -> usize {
        self.placed
    }

    pub fn skipped_labels(&self) -> usize {
        self.skipped
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl ChartHandle for TextChart {
    fn destroy(&mut self) -> Result<(), ChartError> {
        if !self.live {
            return Err(ChartError::Destroy {
                reason: format!("chart in '{}' already destroyed", self.slot),
            });
        }
        self.live = false;
        debug!(slot = %self.slot, "text chart destroyed");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TextChartEngine {
    frame: ChartFrame,
    layout: LabelLayout,
    /// Print rendered charts to stdout
    echo: bool,
}

impl TextChartEngine {
    pub fn new(frame: ChartFrame, layout: LabelLayout) -> Self {
        Self {
            frame,
            layout,
            echo: true,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ChartFrame::from_config(config),
            LabelLayout::from_config(config),
        )
    }

    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Run the label layout and report, per candidate in generation order,
    /// whether its label was placed.
    fn visible_labels(&self, spec: &ChartSpec) -> Vec<bool> {
        let candidates = value_label_candidates(spec, &self.frame);
        let mut ordered: Vec<(usize, LabelCandidate)> =
            candidates.into_iter().enumerate().collect();
        ordered.sort_by(|a, b| b.1.priority.total_cmp(&a.1.priority));

        let (indices, ordered): (Vec<usize>, Vec<LabelCandidate>) = ordered.into_iter().unzip();
        let anchors = [self.frame.title_box(&spec.title)];
        let placements = self.layout.place(&ordered, &anchors);

        let mut visible = vec![false; indices.len()];
        for (idx, placement) in indices.into_iter().zip(&placements) {
            visible[idx] = placement.is_placed();
        }
        visible
    }
}

impl ChartEngine for TextChartEngine {
    type Handle = TextChart;

    fn render(&mut self, slot: &str, spec: &ChartSpec) -> Result<TextChart, ChartError> {
        if spec.is_empty() {
            return Err(ChartError::Empty {
                slot: slot.to_string(),
            });
        }

        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err(ChartError::Render {
                slot: slot.to_string(),
                reason: format!("frame {}x{} has no area", self.frame.width, self.frame.height),
            });
        }

        let visible = self.visible_labels(spec);
        let max = spec.max_abs_value();
        let name_width = spec
            .series
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        let n_labels = spec.labels.len();

        // candidate offset of each series, mirroring value_label_candidates
        let mut offsets = Vec::with_capacity(spec.series.len());
        let mut offset = 0;
        for series in &spec.series {
            offsets.push(offset);
            offset += series.values.len().min(n_labels);
        }

        let mut lines = vec![spec.title.clone(), "=".repeat(spec.title.chars().count())];
        for (l_idx, label) in spec.labels.iter().enumerate() {
            lines.push(label.clone());
            for (s_idx, series) in spec.series.iter().enumerate() {
                let Some(value) = series.values.get(l_idx) else {
                    continue;
                };
                let len = if max > 0.0 {
                    ((value.abs() / max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                let mark = if *value < 0.0 { '-' } else { '#' };
                let text = if visible.get(offsets[s_idx] + l_idx).copied().unwrap_or(false) {
                    format_value(*value)
                } else {
                    String::new()
                };
                lines.push(format!(
                    "  {:<name_width$} |{:<bar_width$}| {}",
                    series.name,
                    mark.to_string().repeat(len),
                    text,
                    bar_width = BAR_WIDTH,
                ));
            }
        }

        let placed = visible.iter().filter(|v| **v).count();
        let chart = TextChart {
            slot: slot.to_string(),
            lines,
            placed,
            skipped: visible.len() - placed,
            live: true,
        };

        if self.echo {
            for line in chart.lines() {
                println!("{line}");
            }
        }
        debug!(slot, placed = chart.placed, skipped = chart.skipped, "text chart rendered");
        Ok(chart)
    }
}
