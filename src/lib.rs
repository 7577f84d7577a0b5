//! Portico - single-connection HTTP gateway
//!
//! Accepts one connection at a time, parses the request line, builds a
//! request context and hands it to a pluggable application callback using a
//! two-phase response protocol.

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod server;

pub use app::{Application, from_fn};
pub use error::GatewayError;
pub use http::body::{Body, Chunk};
pub use http::context::RequestContext;
pub use http::response::{StartResponse, StatusCode};
pub use server::gateway::Gateway;
