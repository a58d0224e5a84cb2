//! Error types
//!
//! Only startup can fail. Request-time misses are turned into 404 responses
//! by the router and never surface here.

use hyper::Method;
use thiserror::Error;

/// A (method, path) pair was registered twice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route already registered: {method} {path}")]
pub struct DuplicateRouteError {
    pub method: Method,
    pub path: String,
}

/// Anything that aborts process startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Route(#[from] DuplicateRouteError),
}
