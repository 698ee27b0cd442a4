//! Prometheus metrics infrastructure

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use regex::Regex;

use super::config::MetricsConfig;

static NUMERIC_SEGMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/\d+(/|$)").ok());

const MAX_PATH_LABEL_LEN: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Path the metrics endpoint is mounted at
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics")
            .field("path", &self.path)
            .finish()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("user_directory_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the outcome of a user directory operation.
///
/// `outcome` is `success` or the error kind label, e.g. `conflict`.
pub fn record_user_operation(operation: &str, outcome: &str) {
    counter!(
        "user_operations_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Sanitize URL path for metric labels (replace user ids, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = match NUMERIC_SEGMENT.as_ref() {
        Some(re) => re.replace_all(path, "/{id}$1").into_owned(),
        None => path.to_string(),
    };

    if path.len() > MAX_PATH_LABEL_LEN {
        path.chars().take(MAX_PATH_LABEL_LEN).collect()
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/users/123"), "/users/{id}");
        assert_eq!(sanitize_path("/users/42/profile"), "/users/{id}/profile");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
        assert_eq!(sanitize_path("/login"), "/login");
    }

    #[test]
    fn test_sanitize_path_keeps_mixed_segments() {
        assert_eq!(sanitize_path("/users/abc123"), "/users/abc123");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        let sanitized = sanitize_path(path);
        assert!(sanitized.len() <= MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_user_operation("create", "success");
        record_http_request("GET", "/users/1", 200, Duration::from_millis(3));
    }
}
