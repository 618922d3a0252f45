//! Fixed responses for routes declared in the config file.
//!
//! # Responsibilities
//! - Turn a `RouteConfig` into a handler answering with its status and body
//! - Fill `{name}` placeholders in the body from path parameters
//!
//! # Design Decisions
//! - Unknown placeholders are left as written
//! - Values are validated at config load; the fallbacks here only cover
//!   routes built programmatically

use axum::http::{header, HeaderValue, Method, StatusCode};

use crate::config::validation::parse_method;
use crate::config::RouteConfig;
use crate::error::RouteError;
use crate::routing::{handler_fn, HandlerFunc, PathParams, Routable};

/// Replace every `{name}` in `template` with the captured `name` parameter.
pub fn render_template(template: &str, params: &PathParams) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match params.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Handler answering with the configured status, content type and body.
pub fn static_handler(route: &RouteConfig) -> HandlerFunc {
    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
    let content_type = HeaderValue::from_str(&route.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("text/plain; charset=utf-8"));
    let body = route.body.clone();

    handler_fn(move |ctx| {
        let rendered = render_template(&body, ctx.path_params());
        let response = ctx.response_mut();
        response.set_header(header::CONTENT_TYPE, content_type.clone());
        response.write_header(status);
        if !rendered.is_empty() {
            response.write(rendered);
        }
    })
}

/// Register every configured route on `router`, stopping at the first error.
pub fn register_config_routes<R: Routable>(router: &mut R, routes: &[RouteConfig]) -> Result<(), RouteError> {
    for route in routes {
        let method: Method = parse_method(&route.method)?;
        router.route(method, &route.pattern, static_handler(route))?;
    }
    Ok(())
}
