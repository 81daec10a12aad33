//! Analytics API client
//!
//! One GET per endpoint; the query string comes from [`crate::query`]. Every
//! failure is surfaced as a single [`ApiError`] and never retried here.

mod client;
mod error;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
pub(crate) mod test_server;

pub use cartera_types::Endpoint;
pub use client::{ApiClient, check_response};
pub use error::ApiError;
