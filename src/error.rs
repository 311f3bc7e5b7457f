use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection could not be checked out of the pool.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// The pool could not be built from the configuration.
    #[error("Pool configuration error: {0}")]
    PoolConfig(#[from] deadpool_postgres::CreatePoolError),

    /// Bad or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The username is already registered.
    #[error("Username already exists")]
    DuplicateUsername,

    /// Another employee already uses this email.
    #[error("Email already exists")]
    DuplicateEmail,

    /// Login with a username that does not exist.
    #[error("User not found")]
    UserNotFound,

    /// Login with the wrong password.
    #[error("Invalid password")]
    InvalidCredentials,

    /// No employee with the requested id.
    #[error("Employee not found")]
    NotFound,

    /// No bearer token on a protected request.
    #[error("Authentication required")]
    Unauthenticated,

    /// Bad or expired token, or an action the role may not perform.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// The HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::PoolConfig(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_)
            | AppError::DuplicateUsername
            | AppError::DuplicateEmail
            | AppError::UserNotFound
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                "Database unavailable".to_string()
            }

            AppError::PoolConfig(ref e) => {
                tracing::error!("Pool configuration error: {}", e);
                "Database unavailable".to_string()
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::DuplicateUsername | AppError::DuplicateEmail => {
                tracing::debug!("Uniqueness violation: {}", self);
                self.to_string()
            }

            AppError::UserNotFound | AppError::InvalidCredentials => {
                tracing::warn!("Login rejected: {}", self);
                self.to_string()
            }

            AppError::NotFound => {
                tracing::debug!("Employee not found");
                self.to_string()
            }

            AppError::Unauthenticated => {
                tracing::warn!("Missing bearer token");
                self.to_string()
            }

            AppError::Forbidden(ref msg) => {
                tracing::warn!("Forbidden: {}", msg);
                msg.clone()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        AppError::Validation(report.to_string().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn login_failures_are_bad_requests() {
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_failures_split_401_and_403() {
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("Invalid token".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn body_carries_the_message() {
        let response = AppError::Validation("email: not a valid email".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "email: not a valid email");
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let response = AppError::Internal("pool exploded".into()).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }
}
