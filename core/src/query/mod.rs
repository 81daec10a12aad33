//! Query string construction for analytics requests.
//!
//! Parameters are emitted in the fixed [`FilterGroup`] declaration order with
//! values sorted inside each group, followed by the scalar `debug` parameter.
//! The output is byte-for-byte reproducible for equivalent selections.

use url::form_urlencoded;

use crate::filters::{FilterGroup, FilterSelection};

/// Name of the scalar debug parameter
pub const DEBUG_PARAM: &str = "debug";

/// A filter selection plus the scalar parameters sent with every request.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsQuery<'a> {
    pub filters: &'a FilterSelection,
    pub debug: Option<&'a str>,
}

impl<'a> AnalyticsQuery<'a> {
    pub fn new(filters: &'a FilterSelection) -> Self {
        Self {
            filters,
            debug: None,
        }
    }

    pub fn with_debug(mut self, debug: Option<&'a str>) -> Self {
        self.debug = debug;
        self
    }

    /// Ordered (name, value) pairs this query serializes to
    pub fn params(&self) -> Vec<(&'static str, &'a str)> {
        let mut params = Vec::new();
        for group in FilterGroup::ALL {
            for value in self.filters.sorted_values(group) {
                params.push((group.param_name(), value));
            }
        }
        if let Some(debug) = self.debug
            && !debug.is_empty()
        {
            params.push((DEBUG_PARAM, debug));
        }
        params
    }

    /// Serialize to a query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        build_query(self)
    }
}

/// Build the URL query string for a request (no leading `?`).
///
/// Empty groups and an empty/absent `debug` contribute nothing, so an
/// unconstrained query yields `""`.
pub fn build_query(query: &AnalyticsQuery<'_>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in query.params() {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}
