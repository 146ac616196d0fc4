//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Resolve document root → Bind listener → Announce → Open browser
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Close listener → Exit 0
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then listener, then browser
//! - In-flight requests get no drain guarantee

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
