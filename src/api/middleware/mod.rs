//! API middleware and request extractors

pub mod bearer;
pub mod logging;
pub mod metrics;

use axum::{body::Body, extract::MatchedPath, http::Request};

pub use bearer::BearerToken;
pub use logging::logging_middleware;
pub use self::metrics::metrics_middleware;

/// Route template when the router matched one (`/users/{id}`), raw path otherwise
fn route_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
