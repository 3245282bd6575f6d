//! The forwarding handler.
//!
//! Validation order is fixed: url presence, url syntax, method, domain,
//! custom headers. The first failing check decides the response.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;
use crate::http::request::{request_id, ForwardParams};
use crate::http::response::relay;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::{authority, build_outbound_headers, parse_custom_headers};
use crate::upstream::OutboundRequest;

/// Entry point for `/` and `/api/proxy`.
pub async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let params = ForwardParams::from_query(request.uri().query());
    // Unlisted verbs share one label to keep metric cardinality bounded.
    let method_label = match state.methods.resolve(&params.method) {
        Some(method) => method.to_string(),
        None => "other".to_string(),
    };

    tracing::debug!(
        request_id = %request_id,
        method = %params.method,
        target = params.url.as_deref().unwrap_or(""),
        "Forwarding request"
    );

    let response = match forward(&state, params, request).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                status = response.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Relaying upstream response"
            );
            response
        }
        Err(err) => {
            match &err {
                GatewayError::UpstreamTimeout(details)
                | GatewayError::UpstreamUnreachable(details) => {
                    tracing::error!(
                        request_id = %request_id,
                        kind = err.kind(),
                        details = %details,
                        "Proxy error"
                    );
                }
                _ => {
                    tracing::warn!(
                        request_id = %request_id,
                        kind = err.kind(),
                        error = %err,
                        "Request rejected"
                    );
                }
            }
            metrics::record_rejection(err.kind());
            err.into_response()
        }
    };

    metrics::record_request(&method_label, response.status().as_u16(), start_time);
    response
}

async fn forward(
    state: &AppState,
    params: ForwardParams,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let target = params.target()?;

    let method = state
        .methods
        .resolve(&params.method)
        .ok_or_else(|| GatewayError::MethodNotAllowed {
            method: params.method.clone(),
            allowed: state.methods.names(),
        })?;

    if !state.domains.permits(&target) {
        return Err(GatewayError::DomainForbidden {
            host: authority(&target).unwrap_or_default(),
            allowed: state
                .expose_allow_list
                .then(|| state.domains.entries().to_vec()),
        });
    }

    let custom = match params.headers.as_deref() {
        Some(raw) => parse_custom_headers(raw)?,
        None => Default::default(),
    };

    let (parts, body) = request.into_parts();
    let headers = build_outbound_headers(&parts.headers, &state.default_user_agent, custom);

    let body = if carries_body(&method) {
        read_body(body, state.max_body_bytes).await?
    } else {
        None
    };

    let upstream = state
        .upstream
        .dispatch(OutboundRequest {
            method: method.clone(),
            url: target,
            headers,
            body,
        })
        .await?;

    Ok(relay(upstream, &method))
}

/// Verbs whose inbound body is forwarded.
pub fn carries_body(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Read the inbound body; an empty body counts as no body.
async fn read_body(body: Body, limit: usize) -> Result<Option<Bytes>, GatewayError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| GatewayError::InvalidBody(e.to_string()))?;
    Ok((!bytes.is_empty()).then_some(bytes))
}
