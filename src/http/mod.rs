//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, trace span)
//!     → cors.rs (OPTIONS answered here)
//!     → server.rs route_request
//!         → POST {prefix}* → relay
//!         → anything else  → ServeDir (document root)
//!     → cors.rs (CORS headers on the way out)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod server;

pub use request::{MakeRelayRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
