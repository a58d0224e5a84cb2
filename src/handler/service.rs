//! Request dispatch entry point
//!
//! Bridges hyper requests to the route table and writes the access log.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::http::ServiceResponse;
use crate::logger::{self, AccessLogEntry};
use crate::routing::RouteRequest;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(serve(&req, &state, peer_addr))
}

/// Dispatch one request through the route table
pub fn serve<B>(req: &Request<B>, state: &AppState, peer_addr: SocketAddr) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let path = req.uri().path();

    let route_req = RouteRequest::new(req.method(), path);
    let response = state.router.dispatch(&route_req);

    if response.status == StatusCode::NOT_FOUND {
        logger::log_debug(&format!("No route for {} {path}", req.method()));
    }

    let logging = &state.config.logging;
    if logging.access_log {
        let entry = access_entry(req, peer_addr, &response, started);
        logger::log_access(&entry, logging.access_log_format);
    }

    response.into_http(&state.config.http.server_name)
}

fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &ServiceResponse,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status.as_u16();
    entry.body_bytes = response.body.len();
    entry.referer = header_value(req, "referer");
    entry.user_agent = header_value(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
