//! Core of the cartera analytics dashboard client
//!
//! Filter state, query building, the analytics API client, payload
//! normalization and the chart pipeline (registry plus label layout).

pub mod api;
pub mod charts;
pub mod context;
pub mod dashboard;
pub mod filters;
pub mod geometry;
pub mod normalize;
pub mod query;

// Re-exports for convenience
pub use api::{ApiClient, ApiError, Endpoint};
pub use charts::{
    ChartEngine, ChartError, ChartHandle, ChartRegistry, ChartSpec, LabelLayout,
    SharedChartRegistry, render_into,
};
pub use context::{AppConfigExt, ConfigError};
pub use dashboard::{Dashboard, PendingFetch, RefreshOutcome};
pub use filters::{FilterGroup, FilterSelection, FilterSignature, signature};
pub use geometry::{LabelBox, overlaps};
pub use normalize::{MovementTrend, NormalizedSeries, normalize_movement, normalize_series};
pub use query::{AnalyticsQuery, build_query};

pub use cartera_types::{AppConfig, LabelPolicy};
