use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{session::Session, user::Role},
    services::auth as auth_service,
    state::AppState,
    validation::{auth::*, payload::AppJson},
};

/// The request payload for user registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// The request payload for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for registration.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub username: String,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Register attempt for: {}", payload.username);
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;
    let role: Role = payload.role.parse()?;

    let user = auth_service::register(&state, payload.username, payload.password, role).await?;

    tracing::info!("✅ User registered: {}", user.id);

    let response = MessageResponse {
        message: "User created successfully".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    tracing::info!("🔐 Login attempt for: {}", payload.username);

    let outcome = auth_service::login(&state, payload.username, payload.password).await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        role: outcome.role,
        username: outcome.username,
    }))
}

/// Returns the session decoded from the caller's token.
#[axum::debug_handler]
pub async fn me(Extension(session): Extension<Session>) -> Json<Session> {
    Json(session)
}
