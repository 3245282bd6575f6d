//! Domain and method allow-lists.
//!
//! Both lists are built once from configuration and shared read-only
//! between requests.

use axum::http::Method;
use url::Url;

/// Domain suffixes a target host must fall under.
///
/// A URL matches an entry when its authority (host, plus `:port` when the
/// port is not the scheme default) equals the entry or ends with `.`
/// followed by the entry. Matching is case-insensitive and never looks at
/// anything other than the parsed authority, so `httpbin.org` does not
/// admit `httpbin.org:6379`.
#[derive(Debug, Clone)]
pub struct DomainAllowList {
    domains: Vec<String>,
}

impl DomainAllowList {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| normalize_host(d.as_ref()))
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Returns true if `host` is an entry or a subdomain of one.
    pub fn permits_host(&self, host: &str) -> bool {
        let host = normalize_host(host);
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// Returns true if the URL has a host and its authority is permitted.
    pub fn permits(&self, url: &Url) -> bool {
        authority(url).is_some_and(|authority| self.permits_host(&authority))
    }

    /// Entries in configuration order.
    pub fn entries(&self) -> &[String] {
        &self.domains
    }
}

/// `host` or `host:port`. `Url::port` is `None` for the scheme's default port.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// HTTP verbs that may be forwarded.
#[derive(Debug, Clone)]
pub struct MethodAllowList {
    methods: Vec<Method>,
}

impl MethodAllowList {
    /// Build from verb names. Names are uppercased; invalid names are skipped
    /// (validation rejects them before this point).
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<Method> = Vec::new();
        for name in methods {
            if let Ok(method) = Method::from_bytes(name.as_ref().to_ascii_uppercase().as_bytes()) {
                if !list.contains(&method) {
                    list.push(method);
                }
            }
        }
        Self { methods: list }
    }

    /// Resolve an already-normalized verb against the list.
    pub fn resolve(&self, name: &str) -> Option<Method> {
        self.methods.iter().find(|m| m.as_str() == name).cloned()
    }

    /// Verb names in configuration order.
    pub fn names(&self) -> Vec<String> {
        self.methods.iter().map(|m| m.to_string()).collect()
    }
}
