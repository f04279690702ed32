//! CORS (Cross-Origin Resource Sharing) middleware
//!
//! Preflight requests are answered here with 204 and never reach the router.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// CORS configuration
#[derive(Clone, Debug)]
pub struct CorsConfig {
    /// Allowed origins (use "*" for any origin)
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<Method>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ],
            allowed_headers: vec![
                "Accept".to_string(),
                "Authorization".to_string(),
                "Content-Type".to_string(),
                "X-CSRF-Token".to_string(),
            ],
        }
    }
}

impl CorsConfig {
    /// Allow the given origins; `"*"` in the list allows any origin
    pub fn with_origins(allowed_origins: Vec<String>) -> Self {
        Self {
            allowed_origins,
            ..Default::default()
        }
    }

    fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Value for `Access-Control-Allow-Origin`, if this origin is allowed
    fn allow_origin(&self, origin: &str) -> Option<HeaderValue> {
        if self.allows_any() {
            return Some(HeaderValue::from_static("*"));
        }
        if origin.is_empty() || !self.allowed_origins.iter().any(|o| o == origin) {
            return None;
        }
        HeaderValue::from_str(origin).ok()
    }
}

fn insert_joined(headers: &mut HeaderMap, name: HeaderName, values: &[&str]) {
    if let Ok(value) = HeaderValue::from_str(&values.join(", ")) {
        headers.insert(name, value);
    }
}

/// CORS middleware
pub async fn cors_middleware(config: CorsConfig, request: Request<Body>, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let allow_origin = config.allow_origin(&origin);

    // Handle preflight OPTIONS request
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;

        if let Some(allow_origin) = allow_origin {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);

            let methods: Vec<&str> = config.allowed_methods.iter().map(Method::as_str).collect();
            insert_joined(headers, header::ACCESS_CONTROL_ALLOW_METHODS, &methods);

            let allowed: Vec<&str> = config.allowed_headers.iter().map(String::as_str).collect();
            insert_joined(headers, header::ACCESS_CONTROL_ALLOW_HEADERS, &allowed);
        }

        return response;
    }

    let mut response = next.run(request).await;

    if let Some(allow_origin) = allow_origin {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    }

    response
}
