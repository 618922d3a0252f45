//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Check every configured route against the routing rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::config::schema::{RouteConfig, ServerConfig};
use crate::error::RouteError;
use crate::routing::{validate_pattern, SUPPORTED_METHODS};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address: {value}")]
    Address { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("route #{index}: {source}")]
    Route { index: usize, source: RouteError },

    #[error("route #{index}: invalid status code {status}")]
    Status { index: usize, status: u16 },

    #[error("route #{index}: invalid content type {value:?}")]
    ContentType { index: usize, value: String },
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "listener",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::Address {
            field: "metrics",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "limits.max_body_bytes",
        });
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(source) = validate_route(route) {
            errors.push(ValidationError::Route { index, source });
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::Status {
                index,
                status: route.status,
            });
        }
        if HeaderValue::from_str(&route.content_type).is_err() {
            errors.push(ValidationError::ContentType {
                index,
                value: route.content_type.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a configured method name, accepting only supported methods.
pub fn parse_method(method: &str) -> Result<Method, RouteError> {
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str() == method)
        .cloned()
        .ok_or_else(|| RouteError::InvalidMethod {
            method: method.to_string(),
        })
}

fn validate_route(route: &RouteConfig) -> Result<(), RouteError> {
    validate_pattern(&route.pattern)?;
    parse_method(&route.method)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(method: &str, pattern: &str) -> RouteConfig {
        RouteConfig {
            method: method.into(),
            pattern: pattern.into(),
            status: 200,
            body: String::new(),
            content_type: "text/plain".into(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.routes.push(route("GET", "/ok/:id"));
        config.routes.push(route("CONNECT", "/tunnel"));
        config.routes.push(route("GET", "/order/*/checkout"));
        config.routes.push(RouteConfig {
            status: 1000,
            ..route("PUT", "/item")
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::Route {
            index: 1,
            source: RouteError::InvalidMethod {
                method: "CONNECT".into()
            },
        }));
        assert!(errors.contains(&ValidationError::Route {
            index: 2,
            source: RouteError::InvalidPattern {
                pattern: "/order/*/checkout".into()
            },
        }));
        assert!(errors.contains(&ValidationError::Status {
            index: 3,
            status: 1000
        }));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_method_is_case_sensitive() {
        assert_eq!(parse_method("GET"), Ok(Method::GET));
        assert_eq!(parse_method("DELETE"), Ok(Method::DELETE));
        assert!(parse_method("get").is_err());
        assert!(parse_method("PATCH").is_err());
    }
}
