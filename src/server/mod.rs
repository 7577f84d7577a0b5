//! Transport side: the listening socket and the accept/handle loop.

pub mod gateway;
pub mod listener;

pub use gateway::Gateway;
pub use listener::{Listener, ServerIdentity};
