//! Route registration errors.

use thiserror::Error;

/// Errors returned when registering a route.
///
/// Lookups never fail with an error: an unmatched path or an unsupported
/// method is reported as "not found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The wildcard `*` is not the last character, or does not occupy its own segment.
    #[error("invalid router pattern: {pattern}")]
    InvalidPattern { pattern: String },

    /// The method is not one of the supported methods.
    #[error("invalid method: {method}")]
    InvalidMethod { method: String },
}
