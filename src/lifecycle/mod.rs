//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Startup is fail-fast: any config, client or bind error is fatal
//! - In-flight upstream calls are bounded by the forwarding timeout, so
//!   draining always terminates

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
