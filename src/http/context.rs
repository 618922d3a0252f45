//! Per-request context passed through the filter chain to handlers.

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
};
use serde::Serialize;

use crate::http::response::ResponseWriter;
use crate::routing::PathParams;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Request data, captured path parameters and the response being built.
///
/// Contexts are pooled; `reset` must run before a context serves a new request.
#[derive(Debug)]
pub struct Context {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    request_id: Option<String>,
    path_params: PathParams,
    response: ResponseWriter,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            request_id: None,
            path_params: PathParams::new(),
            response: ResponseWriter::new(),
        }
    }
}

impl Context {
    /// Context for a request with no headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut ctx = Self::default();
        ctx.bind(method, path.into(), HeaderMap::new(), Bytes::new());
        ctx
    }

    /// Clear parameters, the response and the previous request.
    pub fn reset(&mut self) {
        self.method = Method::GET;
        self.path.clear();
        self.headers.clear();
        self.body = Bytes::new();
        self.request_id = None;
        self.path_params.clear();
        self.response.reset();
    }

    /// Load a request into a freshly reset context.
    pub fn bind(&mut self, method: Method, path: String, headers: HeaderMap, body: Bytes) {
        self.request_id = headers
            .get(crate::http::request::X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.method = method;
        self.path = path;
        self.headers = headers;
        self.body = body;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    pub fn path_params_mut(&mut self) -> &mut PathParams {
        &mut self.path_params
    }

    /// Shorthand for `path_params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    pub fn response(&self) -> &ResponseWriter {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseWriter {
        &mut self.response
    }

    /// Split borrow used by dispatch: request data read-only, parameters writable.
    pub(crate) fn route_parts(&mut self) -> (&Method, &str, &mut PathParams) {
        (&self.method, &self.path, &mut self.path_params)
    }

    /// Respond with a plain text body.
    pub fn text(&mut self, status: StatusCode, body: impl AsRef<[u8]>) {
        self.response
            .set_header(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        self.response.write_header(status);
        self.response.write(body);
    }

    /// Respond with `value` serialized as JSON; a serialization failure becomes a 500.
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.response
                    .set_header(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                self.response.write_header(status);
                self.response.write(bytes);
            }
            Err(e) => {
                tracing::error!(error = %e, path = %self.path, "Failed to serialize response");
                self.text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        }
    }
}
