//! Forwarding gateway library.
//!
//! Accepts a request naming a target URL, checks it against domain and
//! method allow-lists, forwards it with a bounded timeout and relays the
//! answer with cookie and encoding headers stripped.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
