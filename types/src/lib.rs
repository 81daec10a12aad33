//! Shared types for cartera
//!
//! This crate contains serializable types that are shared between the
//! dashboard core (cartera-core) and the interactive client binary.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Filter Groups
// ─────────────────────────────────────────────────────────────────────────────

/// A named dimension of selectable values constraining analytics queries.
///
/// Variant order is the canonical query parameter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterGroup {
    #[serde(rename = "un")]
    BusinessUnit,
    #[serde(rename = "gestion_month")]
    ManagementMonth,
    #[serde(rename = "via_cobro")]
    CollectionChannel,
    #[serde(rename = "categoria")]
    Category,
    #[serde(rename = "supervisor")]
    Supervisor,
    #[serde(rename = "tramo")]
    Segment,
    #[serde(rename = "via_pago")]
    PaymentChannel,
    #[serde(rename = "contract_month")]
    ContractMonth,
}

impl FilterGroup {
    /// All groups in declaration order
    pub const ALL: [FilterGroup; 8] = [
        FilterGroup::BusinessUnit,
        FilterGroup::ManagementMonth,
        FilterGroup::CollectionChannel,
        FilterGroup::Category,
        FilterGroup::Supervisor,
        FilterGroup::Segment,
        FilterGroup::PaymentChannel,
        FilterGroup::ContractMonth,
    ];

    /// Group identifier, identical to the query parameter name
    pub fn id(&self) -> &'static str {
        match self {
            Self::BusinessUnit => "un",
            Self::ManagementMonth => "gestion_month",
            Self::CollectionChannel => "via_cobro",
            Self::Category => "categoria",
            Self::Supervisor => "supervisor",
            Self::Segment => "tramo",
            Self::PaymentChannel => "via_pago",
            Self::ContractMonth => "contract_month",
        }
    }

    /// Query parameter name for this group
    pub fn param_name(&self) -> &'static str {
        self.id()
    }

    /// Descriptive kebab-case alias accepted on input
    pub fn alias(&self) -> &'static str {
        match self {
            Self::BusinessUnit => "business-unit",
            Self::ManagementMonth => "management-month",
            Self::CollectionChannel => "collection-channel",
            Self::Category => "category",
            Self::Supervisor => "supervisor",
            Self::Segment => "segment",
            Self::PaymentChannel => "payment-channel",
            Self::ContractMonth => "contract-month",
        }
    }

    /// Get the display label for this group
    pub fn label(&self) -> &'static str {
        match self {
            Self::BusinessUnit => "Business Unit",
            Self::ManagementMonth => "Management Month",
            Self::CollectionChannel => "Collection Channel",
            Self::Category => "Category",
            Self::Supervisor => "Supervisor",
            Self::Segment => "Segment",
            Self::PaymentChannel => "Payment Channel",
            Self::ContractMonth => "Contract Month",
        }
    }
}

impl fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a string names no known filter group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterGroup(pub String);

impl fmt::Display for UnknownFilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter group '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilterGroup {}

impl FromStr for FilterGroup {
    type Err = UnknownFilterGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FilterGroup::ALL
            .into_iter()
            .find(|g| g.id() == s || g.alias() == s)
            .ok_or_else(|| UnknownFilterGroup(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Current filter selection: group -> set of selected values.
///
/// An absent group and an empty set both mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    groups: HashMap<FilterGroup, HashSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to a group. Returns false if it was already selected.
    pub fn insert(&mut self, group: FilterGroup, value: impl Into<String>) -> bool {
        self.groups.entry(group).or_default().insert(value.into())
    }

    /// Remove a value from a group. Returns false if it was not selected.
    pub fn remove(&mut self, group: FilterGroup, value: &str) -> bool {
        let Some(values) = self.groups.get_mut(&group) else {
            return false;
        };
        let removed = values.remove(value);
        if values.is_empty() {
            self.groups.remove(&group);
        }
        removed
    }

    /// Toggle a value (as a checkbox would). Returns true if now selected.
    pub fn toggle(&mut self, group: FilterGroup, value: &str) -> bool {
        if self.contains(group, value) {
            self.remove(group, value);
            false
        } else {
            self.insert(group, value);
            true
        }
    }

    /// Replace all values of a group
    pub fn set_values<I, S>(&mut self, group: FilterGroup, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            self.groups.remove(&group);
        } else {
            self.groups.insert(group, set);
        }
    }

    /// Drop the constraint on one group
    pub fn clear_group(&mut self, group: FilterGroup) {
        self.groups.remove(&group);
    }

    /// Drop every constraint
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn contains(&self, group: FilterGroup, value: &str) -> bool {
        self.groups.get(&group).is_some_and(|v| v.contains(value))
    }

    /// Selected values of a group, if any (unordered)
    pub fn values(&self, group: FilterGroup) -> Option<&HashSet<String>> {
        self.groups.get(&group).filter(|v| !v.is_empty())
    }

    /// Selected values of a group, sorted lexicographically
    pub fn sorted_values(&self, group: FilterGroup) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .values(group)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default();
        values.sort_unstable();
        values
    }

    /// True when no group constrains the query
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(HashSet::is_empty)
    }

    /// Iterate constrained groups (order unspecified)
    pub fn iter(&self) -> impl Iterator<Item = (FilterGroup, &HashSet<String>)> {
        self.groups
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(g, v)| (*g, v))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Analytics endpoints consumed by the dashboard (all GET)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    PortfolioSummary,
    PortfolioTrend,
    PerformanceByManagementMonth,
    MovementMorosoTrend,
    AnualesSummary,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::PortfolioSummary,
        Endpoint::PortfolioTrend,
        Endpoint::PerformanceByManagementMonth,
        Endpoint::MovementMorosoTrend,
        Endpoint::AnualesSummary,
    ];

    /// Fixed request path
    pub fn path(&self) -> &'static str {
        match self {
            Self::PortfolioSummary => "/analytics/portfolio/summary",
            Self::PortfolioTrend => "/analytics/portfolio/trend",
            Self::PerformanceByManagementMonth => "/analytics/performance/by-management-month",
            Self::MovementMorosoTrend => "/analytics/movement/moroso-trend",
            Self::AnualesSummary => "/analytics/anuales/summary",
        }
    }

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::PortfolioSummary => "summary",
            Self::PortfolioTrend => "trend",
            Self::PerformanceByManagementMonth => "performance",
            Self::MovementMorosoTrend => "moroso-trend",
            Self::AnualesSummary => "anuales",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|e| e.name() == s || e.path() == s)
            .ok_or_else(|| format!("unknown endpoint '{s}'"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Label Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box of a chart label, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl LabelBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from a top-left origin and a size
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Same box shifted by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }
}

/// How strictly period labels ("MM/YYYY") are validated during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Two digits, slash, four digits, and a month in 01..=12
    #[default]
    Calendar,
    /// Only the two-digits/four-digits shape is checked
    Shape,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the analytics API (no trailing slash needed)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Optional `debug` query parameter forwarded to every request
    #[serde(default)]
    pub debug: Option<String>,
    #[serde(default)]
    pub label_policy: LabelPolicy,
    #[serde(default = "default_label_padding")]
    pub label_padding: f64,
    #[serde(default = "default_label_max_nudges")]
    pub label_max_nudges: u8,
    #[serde(default = "default_label_nudge_step")]
    pub label_nudge_step: f64,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_label_padding() -> f64 {
    2.0
}
fn default_label_max_nudges() -> u8 {
    3
}
fn default_label_nudge_step() -> f64 {
    2.0
}
fn default_chart_width() -> u32 {
    640
}
fn default_chart_height() -> u32 {
    320
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_base_url(default_api_base_url())
    }
}

impl AppConfig {
    /// Create a new AppConfig pointing at the given API.
    /// Other fields use their default values.
    pub fn with_base_url(api_base_url: String) -> Self {
        Self {
            api_base_url,
            request_timeout_secs: default_timeout_secs(),
            debug: None,
            label_policy: LabelPolicy::default(),
            label_padding: default_label_padding(),
            label_max_nudges: default_label_max_nudges(),
            label_nudge_step: default_label_nudge_step(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}
