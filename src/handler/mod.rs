//! Request handler module
//!
//! The service's endpoints, the route table binding them, and the hyper entry
//! point that feeds requests through that table.

pub mod endpoints;
pub mod service;

use hyper::Method;

use crate::error::DuplicateRouteError;
use crate::routing::Router;

// Re-export main entry point
pub use service::handle_request;

/// Build the service's route table
pub fn service_routes() -> Result<Router, DuplicateRouteError> {
    let mut router = Router::new();
    router.register(Method::GET, endpoints::HOME_PATH, endpoints::home)?;
    router.register(Method::GET, endpoints::HEALTH_PATH, endpoints::health)?;
    router.register(Method::GET, endpoints::PRODUCTS_PATH, endpoints::list_products)?;
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteRequest;
    use hyper::StatusCode;

    fn dispatch(router: &Router, method: &Method, path: &str) -> (StatusCode, String) {
        let resp = router.dispatch(&RouteRequest::new(method, path));
        (resp.status, String::from_utf8(resp.body.to_vec()).unwrap())
    }

    #[test]
    fn test_service_routes_table() {
        let router = service_routes().unwrap();
        assert_eq!(router.len(), 3);
        let routes = router.routes();
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/api/products", "/health"]);
        assert!(routes.iter().all(|r| r.method == Method::GET));
    }

    #[test]
    fn test_get_home() {
        let router = service_routes().unwrap();
        let (status, body) = dispatch(&router, &Method::GET, "/");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Java Products Service is running!");
    }

    #[test]
    fn test_get_health() {
        let router = service_routes().unwrap();
        let (status, body) = dispatch(&router, &Method::GET, "/health");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status": "healthy", "service": "java-service"}"#);
    }

    #[test]
    fn test_get_products() {
        let router = service_routes().unwrap();
        let (status, body) = dispatch(&router, &Method::GET, "/api/products");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[{"id":1,"name":"Test Product","price":99.99}]"#);
    }

    #[test]
    fn test_get_unknown_is_404() {
        let router = service_routes().unwrap();
        let (status, _) = dispatch(&router, &Method::GET, "/unknown");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_post_home_is_404() {
        let router = service_routes().unwrap();
        let (status, _) = dispatch(&router, &Method::POST, "/");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_non_get_methods_are_404_everywhere() {
        let router = service_routes().unwrap();
        let methods = [
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::HEAD,
            Method::OPTIONS,
        ];
        for path in ["/", "/health", "/api/products"] {
            for method in &methods {
                let (status, _) = dispatch(&router, method, path);
                assert_eq!(status, StatusCode::NOT_FOUND, "{method} {path}");
            }
        }
    }

    #[test]
    fn test_registering_service_route_twice_fails() {
        let mut router = service_routes().unwrap();
        let err = router
            .register(Method::GET, "/health", endpoints::home)
            .unwrap_err();
        assert_eq!(err.path, "/health");
        assert_eq!(err.method, Method::GET);

        let (_, body) = dispatch(&router, &Method::GET, "/health");
        assert_eq!(body, r#"{"status": "healthy", "service": "java-service"}"#);
    }
}
