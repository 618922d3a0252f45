//! Built-in administrative routes.
//!
//! Registered on the routing tree like any other route when
//! `admin.expose_routes` is enabled.
//!
//! # Design Decisions
//! - Admin paths are reserved on an empty tree, so they become static nodes
//!   and later parameter routes are added as their siblings
//! - An admin path that would land on an existing parameter node is skipped;
//!   the user's route keeps its handler

pub mod handlers;

use axum::http::Method;

use crate::error::RouteError;
use crate::routing::{NodeType, Routable, TreeRouter};
use self::handlers::{routes_handler, status_handler};

pub const STATUS_PATH: &str = "/_status";
pub const ROUTES_PATH: &str = "/_routes";

const ADMIN_PATHS: [&str; 2] = [STATUS_PATH, ROUTES_PATH];

/// Claim the admin paths with placeholder handlers.
///
/// Call on a router with no GET routes yet.
pub fn reserve_admin_routes(router: &mut TreeRouter) -> Result<(), RouteError> {
    router.route(Method::GET, STATUS_PATH, status_handler(String::new(), 0))?;
    router.route(Method::GET, ROUTES_PATH, routes_handler(&[]))?;
    Ok(())
}

/// Install `/_status` and `/_routes` on `router`.
///
/// The route table is a snapshot that includes the admin routes themselves.
pub fn register_admin_routes(router: &mut TreeRouter, name: &str) -> Result<(), RouteError> {
    let mut admin = Vec::with_capacity(ADMIN_PATHS.len());
    for path in ADMIN_PATHS {
        if lands_on_param(router, path) {
            tracing::warn!(path, "Admin route shadowed by a parameter route, not registered");
        } else {
            admin.push(path);
        }
    }

    let mut routes = router.routes();
    for path in &admin {
        if !routes.iter().any(|(m, p)| *m == Method::GET && p.as_str() == *path) {
            routes.push((Method::GET, path.to_string()));
        }
    }

    for path in admin {
        let handler = if path == STATUS_PATH {
            status_handler(name.to_string(), routes.len())
        } else {
            routes_handler(&routes)
        };
        router.route(Method::GET, path, handler)?;
    }
    Ok(())
}

/// Whether inserting `path` under GET would reuse a root-level parameter node.
fn lands_on_param(router: &TreeRouter, path: &str) -> bool {
    let Some(root) = router.tree().root(&Method::GET) else {
        return false;
    };
    root.match_child(path.trim_start_matches('/'), None)
        .is_some_and(|idx| root.child(idx).node_type() == NodeType::Param)
}
