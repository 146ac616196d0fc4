//! Speech API relay subsystem.
//!
//! # Data Flow
//! ```text
//! POST {prefix}{sub-path}
//!     → dispatch.rs (sub-path → Endpoint, or 404)
//!     → read Content-Length bytes
//!     → baidu-token: credentials.rs (ak/sk form → grant URL)
//!       baidu-tts:   body forwarded untouched
//!     → upstream.rs (reqwest call, status policy)
//!     → 200 + relay content type, or 500 "Proxy error: ..." (error.rs)
//! ```
//!
//! # Design Decisions
//! - One error boundary per request; nothing is retried
//! - The full upstream body is buffered before the response is built
//! - Audio payloads are opaque bytes

pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod upstream;

pub use credentials::Credentials;
pub use dispatch::{relay, Endpoint};
pub use error::RelayError;
pub use upstream::{UpstreamClient, UpstreamReply};
