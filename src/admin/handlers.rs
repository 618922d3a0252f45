//! JSON handlers behind the admin routes.

use axum::http::{Method, StatusCode};
use serde::Serialize;

use crate::routing::{handler_fn, HandlerFunc};

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub name: String,
    pub routes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub method: String,
    pub pattern: String,
}

/// `GET /_status`
pub fn status_handler(name: String, routes: usize) -> HandlerFunc {
    handler_fn(move |ctx| {
        let status = SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            name: name.clone(),
            routes,
        };
        ctx.json(StatusCode::OK, &status);
    })
}

/// `GET /_routes`
pub fn routes_handler(routes: &[(Method, String)]) -> HandlerFunc {
    let entries: Vec<RouteEntry> = routes
        .iter()
        .map(|(method, pattern)| RouteEntry {
            method: method.to_string(),
            pattern: pattern.clone(),
        })
        .collect();

    handler_fn(move |ctx| ctx.json(StatusCode::OK, &entries))
}
