//! Pattern validation and path splitting.
//!
//! # Responsibilities
//! - Reject malformed wildcard patterns before the tree is touched
//! - Split patterns and request paths into segments the same way
//!
//! # Design Decisions
//! - A wildcard must be the final character and sit in its own segment
//! - Only leading and trailing separators are trimmed; empty inner segments are kept

use crate::error::RouteError;

/// Segment separator.
pub const SEPARATOR: char = '/';

/// The wildcard segment.
pub const PATTERN_ANY: &str = "*";

/// Prefix that marks a parameter segment.
pub const PARAM_PREFIX: char = ':';

/// Validate a registration pattern.
///
/// Fails when `*` appears anywhere except the last character, or when it is
/// glued to literal text instead of following a `/`.
pub fn validate_pattern(pattern: &str) -> Result<(), RouteError> {
    let Some(pos) = pattern.find('*') else {
        return Ok(());
    };

    let last = pattern.len() - 1;
    let glued = pos > 0 && pattern.as_bytes()[pos - 1] != b'/';
    if pos != last || glued {
        return Err(RouteError::InvalidPattern {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// Trim separators from both ends and split into segments.
///
/// An empty or root path yields a single empty segment.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.trim_matches(SEPARATOR).split(SEPARATOR).collect()
}
