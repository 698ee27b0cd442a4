//! JSON extractor/responder whose rejections use the API error envelope

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::{ApiError, ApiErrorType};

/// Wrapper around `axum::Json` that reports malformed bodies as `ApiError`
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(rejection_to_error(&rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn rejection_to_error(rejection: &JsonRejection) -> ApiError {
    ApiError::new(
        rejection.status(),
        ApiErrorType::InvalidRequestError,
        rejection_message(rejection),
    )
    .with_code("json_parse_error")
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => {
            format!("Invalid JSON syntax: {}", err.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        JsonRejection::BytesRejection(err) => {
            format!("Failed to read request body: {}", err.body_text())
        }
        _ => "Invalid JSON request".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Login {
        username: String,
    }

    fn json_request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/login");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_body() {
        let request = json_request(Some("application/json"), r#"{"username":"alice"}"#);

        let Json(login) = Json::<Login>::from_request(request, &()).await.unwrap();
        assert_eq!(login.username, "alice");
    }

    #[tokio::test]
    async fn test_syntax_error_is_enveloped() {
        let request = json_request(Some("application/json"), "{oops");

        let err = Json::<Login>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code.as_deref(), Some("json_parse_error"));
        assert!(err.response.error.message.starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = json_request(None, r#"{"username":"alice"}"#);

        let err = Json::<Login>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_data_error() {
        let request = json_request(Some("application/json"), r#"{"username":5}"#);

        let err = Json::<Login>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.response.error.message.starts_with("Invalid JSON data"));
    }
}
