//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Collect routes and middlewares, then freeze them into a dispatch chain
//! - Wire up tower layers (request ID, tracing, timeout, body limit)
//! - Hand every request to the filter chain through a pooled `Context`
//! - Swap in a rebuilt router when the config file changes
//! - Graceful shutdown on the lifecycle broadcast
//!
//! # Design Decisions
//! - The router is never mutated while serving; reloads build a new one and
//!   swap it atomically (`arc-swap`), in-flight requests keep the old one
//! - axum only provides the listener and the fallback entry point; all
//!   routing decisions are made by the tree

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use http_body_util::LengthLimitError;
use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{register_admin_routes, reserve_admin_routes};
use crate::config::ServerConfig;
use crate::error::RouteError;
use crate::http::context::Context;
use crate::http::middleware::{build_chain, router_filter, AccessLog, DispatchMetrics, Filter, Middleware};
use crate::http::pool::ContextPool;
use crate::http::request::{request_id_header, UuidRequestId};
use crate::http::responder::register_config_routes;
use crate::observability::metrics;
use crate::routing::{validate_pattern, HandlerFunc, Routable, TreeRouter, SUPPORTED_METHODS};

/// Router plus the chain folded around it.
struct Dispatch {
    router: Arc<TreeRouter>,
    chain: Filter,
}

/// State injected into the axum fallback handler.
#[derive(Clone)]
struct AppState {
    dispatch: Arc<ArcSwap<Dispatch>>,
    pool: Arc<ContextPool>,
}

/// A programmatic route, replayed onto every rebuilt tree.
#[derive(Clone)]
struct Registration {
    method: Method,
    pattern: String,
    handler: HandlerFunc,
}

/// Collects routes and middlewares before the server starts.
pub struct ServerBuilder {
    config: ServerConfig,
    routes: Vec<Registration>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl ServerBuilder {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
            middlewares: Vec::new(),
        }
    }

    /// Append a middleware. Earlier middlewares wrap later ones.
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Freeze routes and middlewares into a server.
    ///
    /// Config routes are registered after programmatic ones and replace them
    /// on identical patterns.
    pub fn build(self) -> Result<HttpServer, RouteError> {
        let mut middlewares: Vec<Arc<dyn Middleware>> = Vec::new();
        if self.config.observability.access_log {
            middlewares.push(Arc::new(AccessLog));
        }
        middlewares.push(Arc::new(DispatchMetrics));
        middlewares.extend(self.middlewares);

        let dispatch = assemble(&self.routes, &self.config, &middlewares)?;
        let pool = ContextPool::new(self.config.pool.max_idle);

        Ok(HttpServer {
            name: self.config.name.clone(),
            config: self.config,
            base: self.routes,
            middlewares,
            dispatch: Arc::new(ArcSwap::from_pointee(dispatch)),
            pool,
        })
    }
}

impl Routable for ServerBuilder {
    /// Checks the pattern and method now; the route is inserted at build.
    fn route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) -> Result<(), RouteError> {
        validate_pattern(pattern)?;
        if !SUPPORTED_METHODS.contains(&method) {
            return Err(RouteError::InvalidMethod {
                method: method.to_string(),
            });
        }
        self.routes.push(Registration {
            method,
            pattern: pattern.to_string(),
            handler,
        });
        Ok(())
    }
}

/// HTTP server dispatching every request through the routing tree.
pub struct HttpServer {
    name: String,
    config: ServerConfig,
    /// Programmatic routes in registration order; config routes are layered
    /// on top per build.
    base: Vec<Registration>,
    middlewares: Vec<Arc<dyn Middleware>>,
    dispatch: Arc<ArcSwap<Dispatch>>,
    pool: Arc<ContextPool>,
}

impl HttpServer {
    /// Server with the config's routes and no programmatic ones.
    pub fn from_config(config: ServerConfig) -> Result<Self, RouteError> {
        ServerBuilder::new(config).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The router currently serving requests.
    pub fn router(&self) -> Arc<TreeRouter> {
        self.dispatch.load().router.clone()
    }

    /// Run `ctx` through the middleware chain and the router.
    pub fn dispatch(&self, ctx: &mut Context) {
        let dispatch = self.dispatch.load();
        (dispatch.chain)(ctx);
    }

    /// Rebuild the router with the routes from `config` and swap it in.
    ///
    /// Only `routes` and `admin` are taken from `config`; other settings
    /// need a restart. On error the current router stays active.
    pub fn reload(&self, config: &ServerConfig) -> Result<(), RouteError> {
        let dispatch = assemble(&self.base, config, &self.middlewares)?;
        let routes = dispatch.router.len();
        self.dispatch.store(Arc::new(dispatch));
        tracing::info!(server = %self.name, routes, "Routes reloaded");
        Ok(())
    }

    /// Build the axum application with all layers.
    #[allow(deprecated)]
    pub fn app(&self) -> Router {
        let state = AppState {
            dispatch: self.dispatch.clone(),
            pool: self.pool.clone(),
        };

        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), UuidRequestId))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)));

        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(layers)
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the config routes.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let app = self.app();
        let server = Arc::new(self);

        tracing::info!(
            server = %server.name,
            address = %addr,
            routes = server.router().len(),
            "HTTP server starting"
        );

        let reloader = server.clone();
        let reload_task = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = reloader.reload(&config) {
                    tracing::error!(server = %reloader.name, error = %e, "Reload rejected, keeping current routes");
                }
            }
        });

        let name = server.name.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!(server = %name, "shutdown start");
            })
            .await?;

        reload_task.abort();
        tracing::info!(server = %server.name, "shutdown end");
        Ok(())
    }
}

/// Build a fresh tree from admin, programmatic and config routes, in that
/// order, and fold the chain around it.
fn assemble(
    base: &[Registration],
    config: &ServerConfig,
    middlewares: &[Arc<dyn Middleware>],
) -> Result<Dispatch, RouteError> {
    let mut router = TreeRouter::new();
    if config.admin.expose_routes {
        reserve_admin_routes(&mut router)?;
    }
    for registration in base {
        router.route(
            registration.method.clone(),
            &registration.pattern,
            registration.handler.clone(),
        )?;
    }
    register_config_routes(&mut router, &config.routes)?;
    if config.admin.expose_routes {
        register_admin_routes(&mut router, &config.name)?;
    }

    for (method, pattern) in router.routes() {
        tracing::debug!(method = %method, pattern = %pattern, "Serving route");
    }
    metrics::record_routes_registered(router.len());

    let router = Arc::new(router);
    let chain = build_chain(middlewares, router_filter(router.clone()));
    Ok(Dispatch { router, chain })
}

/// Fallback handler: every request lands here and is routed by the tree.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit(&e) => {
            tracing::warn!(method = %parts.method, path = %parts.uri.path(), "Request body over limit");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response();
        }
        Err(e) => {
            tracing::warn!(method = %parts.method, path = %parts.uri.path(), error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    let mut ctx = state.pool.acquire();
    ctx.bind(parts.method, parts.uri.path().to_string(), parts.headers, body);

    let dispatch = state.dispatch.load();
    (dispatch.chain)(&mut *ctx);
    ctx.response_mut().take()
}

/// Whether `err` or one of its sources is the body limit being hit.
///
/// Bodies without a `content-length` are only cut off while being read.
fn is_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
