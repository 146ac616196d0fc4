//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (port, root, browser)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the HTTP server and upstream client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts
//! - All fields have defaults; running without a file gives the reference setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, ProxyConfig, RelayConfig, StaticFilesConfig,
    TimeoutConfig, UpstreamConfig, UpstreamStatusPolicy,
};
pub use validation::{validate_config, ValidationError};
