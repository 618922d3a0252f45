//! Method-aware request router built on a segment trie.

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use error::RouteError;
pub use http::{Context, HttpServer, ServerBuilder};
pub use lifecycle::Shutdown;
pub use routing::{handler_fn, Routable, TreeRouter};
