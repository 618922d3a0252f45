//! Access logging middleware.

use std::sync::Arc;
use std::time::Instant;

use crate::http::context::Context;
use crate::http::middleware::{Filter, Middleware};

/// Logs one structured event per dispatched request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLog;

impl Middleware for AccessLog {
    fn wrap(&self, next: Filter) -> Filter {
        Arc::new(move |ctx: &mut Context| {
            let start = Instant::now();
            next(ctx);
            tracing::info!(
                request_id = ctx.request_id().unwrap_or("-"),
                method = %ctx.method(),
                path = %ctx.path(),
                status = ctx.response().status().as_u16(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "Request dispatched"
            );
        })
    }
}
