//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream status verbatim
//! - Strip headers that must not cross the gateway
//! - Stream the upstream body without buffering
//!
//! # Design Decisions
//! - `set-cookie` never propagates cross-origin
//! - `content-encoding` and `transfer-encoding` are dropped because the body
//!   is re-framed by this server after the upstream client decoded it
//! - A response always carries a content type

use axum::{
    body::Body,
    http::{
        header::{CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE, TRANSFER_ENCODING},
        HeaderMap, HeaderName, HeaderValue, Method,
    },
    response::Response,
};

/// Upstream response headers that are never relayed.
pub const STRIPPED_RESPONSE_HEADERS: [HeaderName; 3] =
    [SET_COOKIE, CONTENT_ENCODING, TRANSFER_ENCODING];

/// Content type used when the upstream sent none.
pub const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// Copy upstream headers minus the stripped set, adding a content type if
/// none survived.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len() + 1);
    for (name, value) in upstream {
        if !STRIPPED_RESPONSE_HEADERS.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    }
    headers
}

/// Turn an upstream response into the response written to the caller.
///
/// `method` is the verb that was forwarded. A HEAD upstream answer has no
/// body but may advertise one, so its length is dropped.
pub fn relay(upstream: reqwest::Response, method: &Method) -> Response {
    let status = upstream.status();
    let mut headers = filter_response_headers(upstream.headers());

    let body = if method == Method::HEAD {
        headers.remove(CONTENT_LENGTH);
        Body::empty()
    } else {
        Body::from_stream(upstream.bytes_stream())
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_cookie_and_encoding_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert("Set-Cookie", HeaderValue::from_static("a=b"));
        upstream.append("set-cookie", HeaderValue::from_static("c=d"));
        upstream.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        upstream.insert("Transfer-Encoding", HeaderValue::from_static("chunked"));
        upstream.insert("Content-Type", HeaderValue::from_static("application/json"));
        upstream.insert("X-Upstream", HeaderValue::from_static("1"));

        let headers = filter_response_headers(&upstream);

        assert!(headers.get(SET_COOKIE).is_none());
        assert!(headers.get(CONTENT_ENCODING).is_none());
        assert!(headers.get(TRANSFER_ENCODING).is_none());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers["x-upstream"], "1");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_fallback_content_type() {
        let mut upstream = HeaderMap::new();
        upstream.insert("Cache-Control", HeaderValue::from_static("no-store"));

        let headers = filter_response_headers(&upstream);

        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers["cache-control"], "no-store");
    }

    #[test]
    fn test_multi_valued_headers_preserved() {
        let mut upstream = HeaderMap::new();
        upstream.append("Vary", HeaderValue::from_static("Accept"));
        upstream.append("Vary", HeaderValue::from_static("Origin"));

        let headers = filter_response_headers(&upstream);

        let vary: Vec<_> = headers.get_all("vary").iter().collect();
        assert_eq!(vary, ["Accept", "Origin"]);
    }
}
