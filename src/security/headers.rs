//! Outbound header assembly.
//!
//! # Responsibilities
//! - Parse the caller-supplied `headers` JSON object
//! - Carry the caller's User-Agent, or a default, upstream
//! - Overlay custom headers last so they win over everything else
//!
//! # Design Decisions
//! - Nothing else from the inbound request is forwarded (no cookies,
//!   no authorization, no X-Forwarded-*)
//! - Header names compare case-insensitively, so a custom `user-agent`
//!   replaces the carried one

use axum::http::{
    header::{HeaderName, USER_AGENT},
    HeaderMap, HeaderValue,
};
use serde_json::Value;

use crate::error::GatewayError;

/// Parse the `headers` query parameter into a header map.
///
/// The payload must be a JSON object. String values are used as-is;
/// numbers and booleans are rendered as their JSON text. Anything else
/// (null, arrays, nested objects) is rejected, as are names or values that
/// cannot appear in an HTTP header.
pub fn parse_custom_headers(raw: &str) -> Result<HeaderMap, GatewayError> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| GatewayError::InvalidHeadersJson(e.to_string()))?;

    let Value::Object(members) = parsed else {
        return Err(GatewayError::InvalidHeadersJson(
            "expected a JSON object".to_string(),
        ));
    };

    let mut headers = HeaderMap::with_capacity(members.len());
    for (name, value) in members {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(GatewayError::InvalidHeadersJson(format!(
                    "value for '{}' must be a string",
                    name
                )))
            }
        };

        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            GatewayError::InvalidHeadersJson(format!("'{}' is not a valid header name", name))
        })?;
        let header_value = HeaderValue::from_str(&text).map_err(|_| {
            GatewayError::InvalidHeadersJson(format!("value for '{}' is not a valid header", name))
        })?;

        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Build the header set sent upstream.
pub fn build_outbound_headers(
    inbound: &HeaderMap,
    default_user_agent: &HeaderValue,
    custom: HeaderMap,
) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(custom.len() + 1);

    let user_agent = inbound
        .get(USER_AGENT)
        .cloned()
        .unwrap_or_else(|| default_user_agent.clone());
    headers.insert(USER_AGENT, user_agent);

    // `custom` holds at most one value per name, so the iterator yields
    // every name exactly once.
    for (name, value) in custom {
        if let Some(name) = name {
            headers.insert(name, value);
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_ua() -> HeaderValue {
        HeaderValue::from_static("forward-gateway/test")
    }

    #[test]
    fn test_parse_object() {
        let headers =
            parse_custom_headers(r#"{"Accept": "application/json", "X-Count": 3, "X-Flag": true}"#)
                .unwrap();

        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["x-count"], "3");
        assert_eq!(headers["x-flag"], "true");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        for raw in ["not json", "[1,2,3]", "null", "\"text\"", "42", ""] {
            let err = parse_custom_headers(raw).unwrap_err();
            assert!(
                matches!(err, GatewayError::InvalidHeadersJson(_)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_members() {
        assert!(parse_custom_headers(r#"{"X-Nested": {"a": 1}}"#).is_err());
        assert!(parse_custom_headers(r#"{"X-Null": null}"#).is_err());
        assert!(parse_custom_headers(r#"{"Bad Name": "v"}"#).is_err());
        assert!(parse_custom_headers(r#"{"X-Line": "a\nb"}"#).is_err());
    }

    #[test]
    fn test_user_agent_carried_from_inbound() {
        let mut inbound = HeaderMap::new();
        inbound.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        inbound.insert("cookie", HeaderValue::from_static("session=1"));

        let headers = build_outbound_headers(&inbound, &default_ua(), HeaderMap::new());

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[USER_AGENT], "curl/8.0");
    }

    #[test]
    fn test_default_user_agent() {
        let headers = build_outbound_headers(&HeaderMap::new(), &default_ua(), HeaderMap::new());
        assert_eq!(headers[USER_AGENT], "forward-gateway/test");
    }

    #[test]
    fn test_custom_headers_override_user_agent() {
        let mut inbound = HeaderMap::new();
        inbound.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let custom = parse_custom_headers(r#"{"user-agent": "Custom/2.0", "X-Api-Key": "k"}"#)
            .unwrap();

        let headers = build_outbound_headers(&inbound, &default_ua(), custom);

        assert_eq!(headers[USER_AGENT], "Custom/2.0");
        assert_eq!(headers["x-api-key"], "k");
        assert_eq!(headers.get_all(USER_AGENT).iter().count(), 1);
    }
}
