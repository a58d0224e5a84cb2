//! Routing module
//!
//! Exact-match dispatch from (method, path) to a handler. The table is built
//! once at startup and is read-only while serving.

mod router;

pub use router::{RouteRequest, Router};
