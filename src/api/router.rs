use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::users;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(users::create_users_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    match metrics {
        Some(m) => router.merge(create_metrics_router(m)),
        None => router,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::user::{
        InMemoryUserRepository, RandomTokenGenerator, UserDirectory,
    };

    fn app() -> Router {
        let directory = UserDirectory::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(RandomTokenGenerator::new()),
        );

        create_router_with_state(AppState::new(Arc::new(directory)), None)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    async fn register(app: &Router, username: &str, password: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/users",
            Some(json!({"name": "Test", "username": username, "password": password})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_probes() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "user_store");

        let (status, _) = send(&app, Method::GET, "/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_returns_user_with_token() {
        let app = app();

        let body = register(&app, "alice", "pw1").await;

        assert_eq!(body["id"], 1);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["name"], "Test");
        assert_eq!(body["status"], "ONLINE");
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_validation_and_conflict() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({"username": "", "password": "pw"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");

        let (status, _) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({"username": "bob"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        register(&app, "bob", "pw").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({"username": "bob", "password": "other"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["type"], "conflict_error");
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let app = app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let app = app();
        register(&app, "alice", "pw1").await;
        register(&app, "bob", "pw2").await;

        let (status, body) = send(&app, Method::GET, "/users", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["username"], "alice");
        assert!(users[0].get("token").is_none());

        let (status, body) = send(&app, Method::GET, "/users/2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "bob");

        let (status, body) = send(&app, Method::GET, "/users/99", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "User with ID 99 was not found");

        let (status, body) = send(&app, Method::GET, "/users/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "id");
    }

    #[tokio::test]
    async fn test_login_outcomes() {
        let app = app();
        let created = register(&app, "alice", "pw1").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"username": "alice", "password": "pw1"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], created["token"]);
        assert_eq!(body["status"], "ONLINE");

        let (status, _) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"username": "alice", "password": "nope"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"username": "carol", "password": "pw"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::POST, "/login", Some(json!({})), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_requires_owner_token() {
        let app = app();
        let alice = register(&app, "alice", "pw1").await;
        let bob = register(&app, "bob", "pw2").await;
        let patch = json!({"username": "alice2"});

        let (status, _) = send(&app, Method::PUT, "/users/1", Some(patch.clone()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/users/1",
            Some(patch.clone()),
            bob["token"].as_str(),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/users/42",
            Some(patch),
            alice["token"].as_str(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_scenario() {
        let app = app();
        let alice = register(&app, "alice", "pw1").await;
        register(&app, "bob", "pw2").await;
        let token = alice["token"].as_str();

        let (status, _) = send(
            &app,
            Method::PUT,
            "/users/1",
            Some(json!({"username": "bob"})),
            token,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/users/1",
            Some(json!({"username": "alice2", "birthday": "1990-05-17"})),
            token,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, body) = send(&app, Method::GET, "/users/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice2");
        assert_eq!(body["birthday"], "1990-05-17");
        assert_eq!(body["creationDate"], alice["creationDate"]);
        assert_eq!(body["name"], "Test");

        let (status, _) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"username": "alice2", "password": "pw1"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_route_absent_when_disabled() {
        let app = app();

        let (status, _) = send(&app, Method::GET, "/metrics", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
