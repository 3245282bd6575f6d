//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Domains the gateway forwards to when no configuration file overrides them.
pub const DEFAULT_DOMAIN_ALLOW_LIST: &[&str] = &[
    "jsonplaceholder.typicode.com",
    "httpbin.org",
    "api.github.com",
    "scratch.mit.edu",
    "api.scratch.mit.edu",
    "shaman2016scratch.github.io",
    "dashblocks.github.io",
    "turbowarp.org",
    "mirror.turbowarp.xyz",
    "github.com",
    "telegram.org",
    "api.telegram.org",
    "penguinmod.com",
];

/// Verbs the gateway forwards when no configuration file overrides them.
pub const DEFAULT_METHOD_ALLOW_LIST: &[&str] =
    &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// User-Agent sent upstream when the caller did not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("forward-gateway/", env!("CARGO_PKG_VERSION"));

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, inbound limits).
    pub listener: ListenerConfig,

    /// Forwarding policy: allow-lists, upstream timeout, User-Agent.
    pub forwarding: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound on the whole inbound request, in seconds.
    /// Must exceed `forwarding.timeout_ms`.
    pub request_timeout_secs: u64,

    /// Largest inbound body forwarded upstream, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Forwarding policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Domain suffixes a target host must equal or be a subdomain of.
    #[serde(alias = "domainAllowList")]
    pub domain_allow_list: Vec<String>,

    /// HTTP verbs that may be forwarded.
    #[serde(alias = "methodAllowList")]
    pub method_allow_list: Vec<String>,

    /// Hard timeout for the upstream call, in milliseconds.
    #[serde(alias = "timeoutMs")]
    pub timeout_ms: u64,

    /// User-Agent used when the inbound request carries none.
    #[serde(alias = "defaultUserAgent")]
    pub default_user_agent: String,

    /// Whether 403 responses list the allowed domains.
    pub expose_allow_list: bool,

    /// Redirect hops followed upstream (0 relays the first 3xx as-is).
    pub max_redirects: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            domain_allow_list: DEFAULT_DOMAIN_ALLOW_LIST
                .iter()
                .map(|d| d.to_string())
                .collect(),
            method_allow_list: DEFAULT_METHOD_ALLOW_LIST
                .iter()
                .map(|m| m.to_string())
                .collect(),
            timeout_ms: 25_000,
            default_user_agent: DEFAULT_USER_AGENT.to_string(),
            expose_allow_list: true,
            max_redirects: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
