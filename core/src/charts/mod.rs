//! Chart rendering pipeline
//!
//! This module provides:
//! - **Specs**: chart-ready structures built from normalized payloads
//! - **Registry**: live chart-engine instances, at most one per slot
//! - **Labels**: overlap-free placement of value labels
//!
//! # Architecture
//!
//! ```text
//!   NormalizedSeries ──► ChartSpec ──► ChartEngine::render ──► ChartHandle
//!                            │                                     │
//!                            ▼                                     ▼
//!                   value_label_candidates            ChartRegistry::replace
//!                            │                     (old handle destroyed first)
//!                            ▼
//!                    LabelLayout::place
//! ```

mod error;
pub mod labels;
pub mod registry;
mod spec;

#[cfg(test)]
mod registry_tests;

pub use error::ChartError;
pub use labels::{ChartFrame, LabelCandidate, LabelLayout, Placement};
pub use registry::{ChartHandle, ChartRegistry, SharedChartRegistry, release_best_effort};
pub use spec::{ChartEngine, ChartKind, ChartSpec, SeriesSpec};

/// Render `spec` with `engine` into `slot`, replacing whatever was there.
///
/// The previous instance is released before rendering; if rendering fails
/// the slot stays empty and the error is returned.
pub fn render_into<E: ChartEngine>(
    registry: &mut ChartRegistry<E::Handle>,
    engine: &mut E,
    slot: &str,
    spec: &ChartSpec,
) -> Result<bool, ChartError> {
    let stored = registry.try_replace(slot, || engine.render(slot, spec))?;
    Ok(stored.is_some())
}
