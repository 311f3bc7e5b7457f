use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::user::Role;

/// The authenticated caller of a protected request.
///
/// Decoded from the bearer token by the auth middleware and attached to the
/// request extensions. Nothing is stored server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The ID of the user the token was issued to.
    pub user_id: Uuid,
    /// The user's role at the time of login.
    pub role: Role,
    /// The timestamp when the token was issued.
    pub issued_at: DateTime<Utc>,
    /// The timestamp when the token expires.
    pub expires_at: DateTime<Utc>,
}
