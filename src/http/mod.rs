//! HTTP side of the gateway.
//!
//! The gateway understands only the request line; everything else in the
//! request is handed to the application as raw bytes.
//!
//! # Architecture
//!
//! - **`connection`**: owns one accepted client stream for exactly one request cycle
//! - **`parser`**: splits the request line into method, path and version
//! - **`request`**: the parsed request line
//! - **`context`**: the per-request variables handed to the application
//! - **`body`**: response body chunks produced by the application
//! - **`response`**: the two-phase `begin_response` / `finish` contract
//! - **`writer`**: serializes the status line and headers to wire bytes
//!
//! # Request Cycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← read raw request bytes
//!        └──────┬──────┘
//!               │ request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │ AwaitingHeaders  │ ← application runs, calls begin_response
//!        └──────┬───────────┘
//!               │ status + headers recorded
//!               ▼
//!        ┌──────────────────┐
//!        │   HeadersSet     │ ← body drained, response buffered and sent
//!        └──────┬───────────┘
//!               │
//!               ▼
//!            Closed            (on every path, including errors)
//! ```

pub mod body;
pub mod connection;
pub mod context;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
