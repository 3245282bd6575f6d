//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, inbound timeout)
//!     → request.rs (request ID, query parameters, target URL)
//!     → forward.rs (validation pipeline, upstream dispatch)
//!     → response.rs (status + filtered headers, streamed body)
//!     → Send to client
//! ```

pub mod forward;
pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ForwardParams, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
