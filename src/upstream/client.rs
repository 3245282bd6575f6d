//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Send exactly one request per inbound request
//! - Enforce the forwarding timeout from dispatch to end of body
//! - Follow redirects only while they stay inside the domain allow-list
//! - Classify failures as timeout or unreachable
//!
//! # Design Decisions
//! - No retries; a failure is reported once and the request ends
//! - Compressed bodies are decoded here, so relayed responses never carry
//!   `content-encoding`

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::ForwardingConfig;
use crate::error::GatewayError;
use crate::security::DomainAllowList;

/// A fully validated request ready to leave the gateway.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Shared upstream client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// Build the client from forwarding settings.
    pub fn new(
        config: &ForwardingConfig,
        domains: Arc<DomainAllowList>,
    ) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect_policy(config.max_redirects, domains))
            .build()?;

        Ok(Self { inner, timeout })
    }

    /// Configured upstream timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send the request and wait for the upstream response headers.
    pub async fn dispatch(&self, request: OutboundRequest) -> Result<reqwest::Response, GatewayError> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        builder.send().await.map_err(classify)
    }
}

fn redirect_policy(max_redirects: usize, domains: Arc<DomainAllowList>) -> Policy {
    if max_redirects == 0 {
        return Policy::none();
    }

    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.error("too many redirects")
        } else if domains.permits(attempt.url()) {
            attempt.follow()
        } else {
            tracing::warn!(
                location = %attempt.url(),
                "Redirect leaves the domain allow-list, relaying it instead"
            );
            attempt.stop()
        }
    })
}

/// Map a transport failure to the gateway taxonomy.
pub fn classify(err: reqwest::Error) -> GatewayError {
    let details = error_chain(&err);
    if err.is_timeout() {
        GatewayError::UpstreamTimeout(details)
    } else {
        GatewayError::UpstreamUnreachable(details)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
