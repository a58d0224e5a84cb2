//! Service endpoints
//!
//! Every body is a fixed literal. Nothing is computed per request, so the
//! same request always yields byte-identical output.

use crate::http::ServiceResponse;
use crate::routing::RouteRequest;

pub const HOME_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";
pub const PRODUCTS_PATH: &str = "/api/products";

const GREETING: &str = "Java Products Service is running!";
const HEALTH_BODY: &str = r#"{"status": "healthy", "service": "java-service"}"#;
const PRODUCTS_BODY: &str = r#"[{"id":1,"name":"Test Product","price":99.99}]"#;

/// `GET /`
pub const fn home(_req: &RouteRequest<'_>) -> ServiceResponse {
    ServiceResponse::text(GREETING)
}

/// `GET /health`
///
/// Static: reports healthy whenever the process can answer at all.
pub const fn health(_req: &RouteRequest<'_>) -> ServiceResponse {
    ServiceResponse::json(HEALTH_BODY)
}

/// `GET /api/products`
pub const fn list_products(_req: &RouteRequest<'_>) -> ServiceResponse {
    ServiceResponse::json(PRODUCTS_BODY)
}
