//! HTTP protocol layer module
//!
//! Response representation shared by the router and the handlers, decoupled
//! from hyper until the connection boundary.

pub mod response;

// Re-export commonly used types
pub use response::{not_found, ServiceResponse, TEXT_PLAIN};
