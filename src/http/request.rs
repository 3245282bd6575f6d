//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract forwarding instructions from the query string
//! - Resolve the target URL
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Parameters always come from the query string, whatever the inbound verb
//! - First occurrence of a repeated parameter wins

use axum::http::{header::HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::{form_urlencoded, Url};
use uuid::Uuid;

use crate::error::GatewayError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues a fresh UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Forwarding instructions carried in the inbound query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardParams {
    /// Raw `url` parameter; `None` when absent or empty.
    pub url: Option<String>,
    /// Upstream verb, uppercased. `GET` when absent or empty.
    pub method: String,
    /// Raw `headers` parameter; `None` when absent or empty.
    pub headers: Option<String>,
}

impl Default for ForwardParams {
    fn default() -> Self {
        Self {
            url: None,
            method: "GET".to_string(),
            headers: None,
        }
    }
}

impl ForwardParams {
    /// Parse from the raw (still percent-encoded) query string.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut url = None;
        let mut method = None;
        let mut headers = None;

        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "url" => &mut url,
                "method" => &mut method,
                "headers" => &mut headers,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Self {
            url: url.filter(|u: &String| !u.is_empty()),
            method: method
                .filter(|m: &String| !m.is_empty())
                .map(|m| m.to_uppercase())
                .unwrap_or_else(|| "GET".to_string()),
            headers: headers.filter(|h: &String| !h.is_empty()),
        }
    }

    /// The target as an absolute URL.
    pub fn target(&self) -> Result<Url, GatewayError> {
        let raw = self.url.as_deref().ok_or(GatewayError::MissingParameter)?;
        Url::parse(raw).map_err(GatewayError::InvalidUrl)
    }
}
