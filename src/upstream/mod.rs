//! Upstream dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest (method, url, headers, optional body)
//!     → client.rs (reqwest, timeout, redirect policy)
//!     → reqwest::Response on success
//!     → GatewayError::UpstreamTimeout / UpstreamUnreachable on failure
//! ```

pub mod client;

pub use client::{OutboundRequest, UpstreamClient};
