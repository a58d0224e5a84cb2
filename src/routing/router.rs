//! Route table and dispatch
//!
//! Routes are keyed by exact path, then by method. The table is built with
//! `register` during startup and only read afterwards, so it is shared between
//! connection tasks without locking.

use hyper::Method;
use std::collections::HashMap;

use crate::error::DuplicateRouteError;
use crate::http::{self, ServiceResponse};

/// Handler signature: borrows the request, returns an owned response
pub type HandlerFn = fn(&RouteRequest<'_>) -> ServiceResponse;

/// The parts of an incoming request the router looks at.
/// Headers and body are never consulted, so they are not carried.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
}

impl<'a> RouteRequest<'a> {
    pub const fn new(method: &'a Method, path: &'a str) -> Self {
        Self { method, path }
    }
}

/// A (method, path) pair bound to a handler
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    handler: HandlerFn,
}

impl Route {
    pub fn call(&self, req: &RouteRequest<'_>) -> ServiceResponse {
        (self.handler)(req)
    }
}

/// Exact-match router
#[derive(Debug, Default)]
pub struct Router {
    // path -> routes for that path, one per method
    table: HashMap<String, Vec<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to exactly `method` + `path`
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        handler: HandlerFn,
    ) -> Result<(), DuplicateRouteError> {
        let routes = self.table.entry(path.to_string()).or_default();
        if routes.iter().any(|r| r.method == method) {
            return Err(DuplicateRouteError {
                method,
                path: path.to_string(),
            });
        }
        routes.push(Route {
            method,
            path: path.to_string(),
            handler,
        });
        Ok(())
    }

    /// Find the route registered for exactly this method and path
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&Route> {
        self.table.get(path)?.iter().find(|r| r.method == *method)
    }

    /// Run the matching handler, or answer 404
    pub fn dispatch(&self, req: &RouteRequest<'_>) -> ServiceResponse {
        self.lookup(req.method, req.path)
            .map_or_else(http::not_found, |route| route.call(req))
    }

    /// All routes, ordered by path then method
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.table.values().flatten().collect();
        routes.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.method.as_str().cmp(b.method.as_str()))
        });
        routes
    }

    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
