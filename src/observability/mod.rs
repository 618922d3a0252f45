//! Logs and metrics for the dispatch path.
//!
//! # Data Flow
//! ```text
//! TreeRouter (route registered / rejected)   ─┐
//! AccessLog middleware (one event per request) ├→ logging.rs → stdout
//! HttpServer (start, reload, shutdown)        ─┘
//!
//! DispatchMetrics middleware + route count ──→ metrics.rs → /metrics
//! ```
//!
//! # Design Decisions
//! - Every dispatch event carries the request ID from the tower layer
//! - The Prometheus listener is separate from the routed port, so the tree
//!   never sees scrape traffic

pub mod logging;
pub mod metrics;
