//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed target URL and verb:
//!     → access_control.rs (method allow-list, domain allow-list)
//!     → headers.rs (custom headers JSON, User-Agent, outbound header set)
//!     → Pass to upstream dispatch
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any check failure
//! - No trust in client input: only explicitly requested headers go upstream

pub mod access_control;
pub mod headers;

pub use access_control::{authority, DomainAllowList, MethodAllowList};
pub use headers::{build_outbound_headers, parse_custom_headers};
