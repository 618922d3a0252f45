//! Write-once response sink handed to handlers.
//!
//! # Responsibilities
//! - Collect status, headers and body written by a handler
//! - Convert the result into an axum `Response`
//!
//! # Design Decisions
//! - The status line is written once; later attempts are logged and ignored
//! - Writing body bytes without a status implies 200 OK
//! - Headers are frozen once the status is written

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};

/// Buffered response for one request.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the status line. Only the first call has an effect.
    pub fn write_header(&mut self, status: StatusCode) {
        if let Some(current) = self.status {
            tracing::warn!(
                current = %current,
                ignored = %status,
                "Superfluous write_header call"
            );
            return;
        }
        self.status = Some(status);
    }

    /// Append body bytes, writing a 200 status first if none was written.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes.as_ref());
    }

    /// Set a response header. Ignored once the status has been written.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.is_written() {
            tracing::warn!(header = %name, "Header set after status was written");
            return;
        }
        self.headers.insert(name, value);
    }

    /// True once a status has been written, explicitly or by `write`.
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Status to send; 200 when nothing was written.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Forget everything written so far.
    pub fn reset(&mut self) {
        self.status = None;
        self.headers.clear();
        self.body.clear();
    }

    /// Move the buffered response out, leaving the writer empty.
    pub fn take(&mut self) -> Response {
        let status = self.status();
        let headers = std::mem::take(&mut self.headers);
        let body = std::mem::take(&mut self.body);
        self.status = None;

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}
