//! Local development relay for the Baidu speech API.
//!
//! Serves a debug page from a document root and relays its token and
//! synthesis calls to Baidu, adding the CORS headers the browser needs.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                  SPEECH RELAY                    │
//!   Browser       │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!  ───────────────┼─▶│  cors   │──▶│  server  │──▶│ relay        │───┼──▶ aip.baidubce.com
//!                 │  │preflight│   │ dispatch │   │ upstream     │   │    tsn.baidu.com
//!                 │  └─────────┘   └────┬─────┘   └──────────────┘   │
//!                 │                     │                            │
//!                 │                     ▼                            │
//!                 │               ┌──────────┐                       │
//!                 │               │ ServeDir │ (document root)       │
//!                 │               └──────────┘                       │
//!                 │  config · lifecycle · observability              │
//!                 └──────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
