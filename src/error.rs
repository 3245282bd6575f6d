//! Request-level error taxonomy.
//!
//! Every way a forwarded request can fail maps to exactly one variant, and
//! every variant renders as a JSON body `{"error": ..., ...}` with a fixed
//! status code. Nothing here is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Errors produced while forwarding a single request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The `url` query parameter is absent or empty.
    #[error("Parameter \"url\" is required")]
    MissingParameter,

    /// The `url` query parameter is not an absolute URL.
    #[error("Invalid URL format")]
    InvalidUrl(#[source] url::ParseError),

    /// The requested verb is outside the method allow-list.
    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: String, allowed: Vec<String> },

    /// The target host is outside the domain allow-list.
    /// `allowed` is `None` when the list must not be disclosed.
    #[error("Access denied: domain not in whitelist")]
    DomainForbidden {
        host: String,
        allowed: Option<Vec<String>>,
    },

    /// The `headers` query parameter is not a usable JSON object.
    #[error("Invalid headers JSON")]
    InvalidHeadersJson(String),

    /// The inbound body could not be read within the configured limit.
    #[error("Failed to read request body")]
    InvalidBody(String),

    /// The upstream did not answer within the forwarding timeout.
    #[error("Upstream request timed out")]
    UpstreamTimeout(String),

    /// Any other transport failure talking to the upstream.
    #[error("Failed to fetch resource")]
    UpstreamUnreachable(String),
}

impl GatewayError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingParameter
            | GatewayError::InvalidUrl(_)
            | GatewayError::InvalidHeadersJson(_)
            | GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::DomainForbidden { .. } => StatusCode::FORBIDDEN,
            GatewayError::UpstreamTimeout(_) | GatewayError::UpstreamUnreachable(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Stable short name, used as a log field and metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingParameter => "missing_parameter",
            GatewayError::InvalidUrl(_) => "invalid_url",
            GatewayError::MethodNotAllowed { .. } => "method_not_allowed",
            GatewayError::DomainForbidden { .. } => "domain_forbidden",
            GatewayError::InvalidHeadersJson(_) => "invalid_headers_json",
            GatewayError::InvalidBody(_) => "invalid_body",
            GatewayError::UpstreamTimeout(_) => "upstream_timeout",
            GatewayError::UpstreamUnreachable(_) => "upstream_unreachable",
        }
    }

    /// JSON body reported to the caller.
    pub fn body(&self) -> Value {
        let error = self.to_string();
        match self {
            GatewayError::MissingParameter => json!({ "error": error }),
            GatewayError::InvalidUrl(source) => json!({
                "error": error,
                "details": source.to_string(),
            }),
            GatewayError::MethodNotAllowed { allowed, .. } => json!({
                "error": error,
                "allowed": allowed,
            }),
            GatewayError::DomainForbidden { allowed: Some(allowed), .. } => json!({
                "error": error,
                "allowedDomains": allowed,
            }),
            GatewayError::DomainForbidden { allowed: None, .. } => json!({ "error": error }),
            GatewayError::InvalidHeadersJson(details)
            | GatewayError::InvalidBody(details)
            | GatewayError::UpstreamTimeout(details)
            | GatewayError::UpstreamUnreachable(details) => json!({
                "error": error,
                "details": details,
            }),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
