//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject allow-list entries that could never match a parsed URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use tracing_subscriber::EnvFilter;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = &config.listener;
    if listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", listener.bind_address),
        ));
    }
    if listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }
    if listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    let forwarding = &config.forwarding;
    if forwarding.timeout_ms == 0 {
        errors.push(ValidationError::new("forwarding.timeout_ms", "must be greater than 0"));
    } else if listener.request_timeout_secs.saturating_mul(1000) <= forwarding.timeout_ms {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must exceed forwarding.timeout_ms",
        ));
    }

    if forwarding.domain_allow_list.is_empty() {
        errors.push(ValidationError::new("forwarding.domain_allow_list", "must not be empty"));
    }
    for domain in &forwarding.domain_allow_list {
        if !is_valid_domain_entry(domain.trim()) {
            errors.push(ValidationError::new(
                "forwarding.domain_allow_list",
                format!("'{}' is not a valid host or host:port", domain),
            ));
        }
    }

    if forwarding.method_allow_list.is_empty() {
        errors.push(ValidationError::new("forwarding.method_allow_list", "must not be empty"));
    }
    for method in &forwarding.method_allow_list {
        if method.is_empty() || Method::from_bytes(method.to_ascii_uppercase().as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "forwarding.method_allow_list",
                format!("'{}' is not a valid HTTP method", method),
            ));
        }
    }

    if forwarding.default_user_agent.is_empty()
        || HeaderValue::from_str(&forwarding.default_user_agent).is_err()
    {
        errors.push(ValidationError::new(
            "forwarding.default_user_agent",
            "must be a non-empty header value",
        ));
    }

    let observability = &config.observability;
    if EnvFilter::try_new(&observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("'{}' is not a valid filter", observability.log_level),
        ));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host` or `host:port`, where `host` is anything `url::Host` accepts.
fn is_valid_domain_entry(entry: &str) -> bool {
    let (host, port) = match entry.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (host, Some(port))
        }
        _ => (entry, None),
    };
    !host.is_empty()
        && url::Host::parse(host).is_ok()
        && port.is_none_or(|port| port.parse::<u16>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.forwarding.domain_allow_list = vec!["https://github.com/".into(), "".into()];
        config.forwarding.method_allow_list = vec!["GE T".into()];
        config.forwarding.default_user_agent = String::new();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "forwarding.domain_allow_list",
                "forwarding.domain_allow_list",
                "forwarding.method_allow_list",
                "forwarding.default_user_agent",
            ]
        );
    }

    #[test]
    fn test_domain_entries_may_carry_port() {
        let mut config = GatewayConfig::default();
        config.forwarding.domain_allow_list = vec![
            "127.0.0.1:8080".into(),
            "example.com:443".into(),
            "[::1]:3000".into(),
            "[::1]".into(),
        ];
        assert!(validate_config(&config).is_ok());

        config.forwarding.domain_allow_list = vec![
            "example.com:".into(),
            "example.com:99999".into(),
            "::1".into(),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_inbound_timeout_must_cover_upstream() {
        let mut config = GatewayConfig::default();
        config.listener.request_timeout_secs = 25;
        config.forwarding.timeout_ms = 25_000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.request_timeout_secs");
    }

    #[test]
    fn test_empty_allow_lists_rejected() {
        let mut config = GatewayConfig::default();
        config.forwarding.domain_allow_list.clear();
        config.forwarding.method_allow_list.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_lowercase_methods_accepted() {
        let mut config = GatewayConfig::default();
        config.forwarding.method_allow_list = vec!["get".into(), "propfind".into()];
        assert!(validate_config(&config).is_ok());
    }
}
