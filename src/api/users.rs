//! User directory endpoints
//!
//! `GET /users`, `GET /users/{id}`, `POST /users`, `POST /login` and
//! `PUT /users/{id}`. The token is only ever returned by registration and
//! login; updates must present it as a bearer token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::BearerToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{User, UserId, UserStatus};
use crate::infrastructure::user::{CreateUserRequest, LoginRequest, UpdateUserRequest};

/// Create the user directory router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user))
        .route("/login", post(login))
}

/// Registration body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserDto {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login body; absent fields are treated as empty strings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

/// Profile update body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: Option<String>,
    pub username: String,
    pub creation_date: DateTime<Utc>,
    pub birthday: Option<NaiveDate>,
    pub status: UserStatus,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            name: user.name().map(str::to_string),
            username: user.username().to_string(),
            creation_date: user.creation_date(),
            birthday: user.birthday(),
            status: user.status(),
        }
    }
}

/// User view plus the token authorizing later profile updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

impl From<&User> for AuthenticatedUserResponse {
    fn from(user: &User) -> Self {
        Self {
            user: UserResponse::from(user),
            token: user.token().to_string(),
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<i64>()
        .map(UserId::new)
        .map_err(|_| ApiError::bad_request(format!("Invalid user ID: {}", raw)).with_param("id"))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_directory.list().await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&id)?;
    let user = state.user_directory.get(id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<AuthenticatedUserResponse>), ApiError> {
    let user = state
        .user_directory
        .create(CreateUserRequest {
            name: body.name,
            username: body.username,
            password: body.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthenticatedUserResponse::from(&user))))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginDto>,
) -> Result<Json<AuthenticatedUserResponse>, ApiError> {
    let user = state
        .user_directory
        .login(LoginRequest {
            username: body.username,
            password: body.password,
        })
        .await?;

    Ok(Json(AuthenticatedUserResponse::from(&user)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    token: BearerToken,
    Json(body): Json<UpdateUserDto>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;

    state
        .user_directory
        .update(
            id,
            UpdateUserRequest {
                username: body.username,
                birthday: body.birthday,
            },
            token.as_deref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
