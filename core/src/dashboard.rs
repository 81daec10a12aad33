//! Dashboard session state
//!
//! Owns the filter selection and the last committed results. Refreshes are
//! keyed by the selection signature: an unchanged signature skips the
//! refetch, and results fetched under an older signature are never
//! committed.

use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::filters::{FilterSelection, FilterSignature, signature};
use crate::normalize::{MovementTrend, NormalizedSeries, normalize_movement, normalize_payload};
use crate::query::AnalyticsQuery;
use cartera_types::{AppConfig, LabelPolicy};

/// Token for a fetch issued under a given selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    signature: FilterSignature,
}

impl PendingFetch {
    pub fn signature(&self) -> &FilterSignature {
        &self.signature
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Signature unchanged since the last commit; nothing fetched
    Skipped,
    /// Results stored for the current signature
    Committed,
    /// Results belonged to a superseded selection and were dropped.
    /// Only [`Dashboard::commit`] returns this: `refresh` borrows the
    /// session across both requests, so the selection cannot move under it.
    Stale,
}

#[derive(Debug)]
pub struct Dashboard {
    selection: FilterSelection,
    debug: Option<String>,
    policy: LabelPolicy,
    committed: Option<FilterSignature>,
    summary: Option<Value>,
    trend: Option<NormalizedSeries>,
    movement: Option<(FilterSignature, MovementTrend)>,
}

impl Dashboard {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            selection: FilterSelection::new(),
            debug: config.debug.clone(),
            policy: config.label_policy,
            committed: None,
            summary: None,
            trend: None,
            movement: None,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Mutable access for filter controls
    pub fn selection_mut(&mut self) -> &mut FilterSelection {
        &mut self.selection
    }

    /// Set the scalar `debug` parameter. A change alters every request, so
    /// it forces the next refresh and drops the cached movement trend.
    pub fn set_debug(&mut self, debug: Option<String>) {
        let debug = debug.filter(|d| !d.is_empty());
        if self.debug != debug {
            self.debug = debug;
            self.invalidate();
        }
    }

    pub fn debug(&self) -> Option<&str> {
        self.debug.as_deref()
    }

    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    /// Change label validation. Committed results were normalized under the
    /// old policy, so a change forces the next refresh.
    pub fn set_policy(&mut self, policy: LabelPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.committed = None;
        self.movement = None;
    }

    pub fn signature(&self) -> FilterSignature {
        signature(&self.selection)
    }

    pub fn query(&self) -> AnalyticsQuery<'_> {
        AnalyticsQuery::new(&self.selection).with_debug(self.debug.as_deref())
    }

    /// Signature of the currently committed results, if any
    pub fn committed_signature(&self) -> Option<&FilterSignature> {
        self.committed.as_ref()
    }

    /// True when the selection changed since the last commit, or nothing
    /// has been committed under the current debug parameter and policy
    pub fn needs_refresh(&self) -> bool {
        self.committed.as_ref() != Some(&self.signature())
    }

    pub fn begin_fetch(&self) -> PendingFetch {
        PendingFetch {
            signature: self.signature(),
        }
    }

    /// Whether results for `pending` still match the selection
    pub fn is_current(&self, pending: &PendingFetch) -> bool {
        pending.signature == self.signature()
    }

    /// Store summary and trend results if they still match the selection
    pub fn commit(
        &mut self,
        pending: PendingFetch,
        summary: Value,
        trend_payload: &Value,
    ) -> RefreshOutcome {
        if !self.is_current(&pending) {
            debug!(signature = %pending.signature, "dropping stale dashboard results");
            return RefreshOutcome::Stale;
        }
        self.summary = Some(summary);
        self.trend = Some(normalize_payload(trend_payload, self.policy));
        self.committed = Some(pending.signature);
        RefreshOutcome::Committed
    }

    /// Fetch summary, then trend, and commit them.
    ///
    /// Skips the network entirely when the signature is unchanged unless
    /// `force` is set. The first failing request aborts the refresh.
    pub async fn refresh(
        &mut self,
        client: &ApiClient,
        force: bool,
    ) -> Result<RefreshOutcome, ApiError> {
        if !force && !self.needs_refresh() {
            debug!("filters unchanged, skipping refresh");
            return Ok(RefreshOutcome::Skipped);
        }

        let pending = self.begin_fetch();
        let (summary, trend) = {
            let query = self.query();
            let summary = client.portfolio_summary(&query).await?;
            let trend = client.portfolio_trend(&query).await?;
            (summary, trend)
        };

        let outcome = self.commit(pending, summary, &trend);
        info!(?outcome, signature = %self.signature(), "dashboard refreshed");
        Ok(outcome)
    }

    /// Fetch and normalize the moroso movement trend for the current
    /// selection, reusing the cached result when the signature is unchanged.
    pub async fn movement(&mut self, client: &ApiClient) -> Result<&MovementTrend, ApiError> {
        let current = self.signature();
        let trend = match self.movement.take() {
            Some((sig, trend)) if sig == current => trend,
            _ => {
                let payload = client.movement_moroso_trend(&self.query()).await?;
                normalize_movement(&payload, self.policy)
            }
        };
        Ok(&self.movement.insert((current, trend)).1)
    }

    pub fn summary(&self) -> Option<&Value> {
        self.summary.as_ref()
    }

    pub fn trend(&self) -> Option<&NormalizedSeries> {
        self.trend.as_ref()
    }
}
