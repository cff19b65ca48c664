//! Collaborator traits for the RPC binding and the call log.

mod logger;
mod transport;

pub use logger::CallLogger;
pub use transport::Transport;
