//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, inbound timeout)
//! - Build the shared allow-lists and upstream client once
//! - Serve until the shutdown signal fires, then drain

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue, StatusCode},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, GatewayConfig};
use crate::http::forward::forward_handler;
use crate::http::health::get_health;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::security::{DomainAllowList, MethodAllowList};
use crate::upstream::UpstreamClient;

/// Reasons a server cannot be built from a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid default user agent: {0}")]
    UserAgent(#[from] InvalidHeaderValue),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub domains: Arc<DomainAllowList>,
    pub methods: Arc<MethodAllowList>,
    pub upstream: UpstreamClient,
    pub default_user_agent: HeaderValue,
    pub expose_allow_list: bool,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Build shared state from a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ServerError> {
        let forwarding = &config.forwarding;
        let default_user_agent = HeaderValue::from_str(&forwarding.default_user_agent)?;
        let domains = Arc::new(DomainAllowList::new(&forwarding.domain_allow_list));
        let methods = Arc::new(MethodAllowList::new(&forwarding.method_allow_list));
        let upstream = UpstreamClient::new(forwarding, domains.clone())?;

        Ok(Self {
            domains,
            methods,
            upstream,
            default_user_agent,
            expose_allow_list: forwarding.expose_allow_list,
            max_body_bytes: config.listener.max_body_bytes,
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server, rejecting configurations that fail validation.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(forward_handler))
            .route("/api/proxy", any(forward_handler))
            .route("/healthz", get(get_health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_secs(config.listener.request_timeout_secs),
                    )),
            )
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on the given listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            domains = self.config.forwarding.domain_allow_list.len(),
            timeout_ms = self.config.forwarding.timeout_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
