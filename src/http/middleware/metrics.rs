//! Dispatch metrics middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;

use crate::http::context::Context;
use crate::http::middleware::{Filter, Middleware};
use crate::observability::metrics;

/// Records request count, latency and not-found hits for every dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchMetrics;

impl Middleware for DispatchMetrics {
    fn wrap(&self, next: Filter) -> Filter {
        Arc::new(move |ctx: &mut Context| {
            let start = Instant::now();
            next(ctx);

            let method = ctx.method().as_str();
            let status = ctx.response().status();
            metrics::record_request(method, status.as_u16(), start);
            if status == StatusCode::NOT_FOUND {
                metrics::record_not_found(method);
            }
        })
    }
}
