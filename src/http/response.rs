//! HTTP response building module
//!
//! Handlers produce a `ServiceResponse` (status, content type, body). It is
//! converted into a hyper response only at the connection boundary.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

const NOT_FOUND_BODY: &str = "404 Not Found";

/// Response produced by a route handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl ServiceResponse {
    /// Response over a static body, no allocation
    pub const fn from_static(
        status: StatusCode,
        content_type: &'static str,
        body: &'static str,
    ) -> Self {
        Self {
            status,
            content_type,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    /// 200 `text/plain`
    pub const fn text(body: &'static str) -> Self {
        Self::from_static(StatusCode::OK, TEXT_PLAIN, body)
    }

    /// 200 `application/json` over an already-encoded document
    pub const fn json(body: &'static str) -> Self {
        Self::from_static(StatusCode::OK, APPLICATION_JSON, body)
    }

    /// Convert into a hyper response carrying `Content-Type`, `Content-Length`
    /// and `Server` headers
    pub fn into_http(self, server_name: &str) -> Response<Full<Bytes>> {
        let status = self.status;
        Response::builder()
            .status(status)
            .header("Content-Type", self.content_type)
            .header("Content-Length", self.body.len())
            .header("Server", server_name)
            .body(Full::new(self.body))
            .unwrap_or_else(|e| {
                log_build_error(status, &e);
                let mut fallback = Response::new(Full::new(Bytes::new()));
                *fallback.status_mut() = status;
                fallback
            })
    }
}

/// Build 404 Not Found response
pub const fn not_found() -> ServiceResponse {
    ServiceResponse::from_static(StatusCode::NOT_FOUND, TEXT_PLAIN, NOT_FOUND_BODY)
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let resp = not_found();
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.content_type, "text/plain");
        assert_eq!(resp.body, Bytes::from_static(b"404 Not Found"));
    }

    #[test]
    fn test_into_http_headers() {
        let resp = ServiceResponse::json("[]").into_http("unit-test");
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["content-length"], "2");
        assert_eq!(headers["server"], "unit-test");
    }

    #[test]
    fn test_into_http_keeps_status() {
        let resp = not_found().into_http("unit-test");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["content-type"], "text/plain");
    }
}
