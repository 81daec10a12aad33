//! Error types for chart engine operations

use thiserror::Error;

/// Errors reported by a chart engine
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to render chart in slot '{slot}': {reason}")]
    Render { slot: String, reason: String },

    #[error("failed to destroy chart instance: {reason}")]
    Destroy { reason: String },

    #[error("chart in slot '{slot}' has no data")]
    Empty { slot: String },
}
