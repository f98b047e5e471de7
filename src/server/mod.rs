//! Server module
//!
//! HTTP server with real handlers: the media-listing API, the display page,
//! and the health probe.

pub mod http;
pub mod startup;

pub use http::{create_router, AppState};
pub use startup::{run_server_with_config, ServerConfig, ServerHandle};
