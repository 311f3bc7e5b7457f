//! HS256 session tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{session::Session, user::Role};

/// The claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user ID.
    sub: Uuid,
    role: Role,
    /// Issued-at timestamp (seconds since epoch).
    iat: i64,
    /// Expiration timestamp (seconds since epoch).
    exp: i64,
}

impl Claims {
    fn into_session(self) -> Result<Session> {
        let issued_at = DateTime::from_timestamp(self.iat, 0)
            .ok_or_else(|| AppError::Forbidden("Invalid token timestamps".to_string()))?;
        let expires_at = DateTime::from_timestamp(self.exp, 0)
            .ok_or_else(|| AppError::Forbidden("Invalid token timestamps".to_string()))?;

        Ok(Session {
            user_id: self.sub,
            role: self.role,
            issued_at,
            expires_at,
        })
    }
}

/// Signs and verifies session tokens with one HMAC secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenKeys {
    /// Creates the keys from the HMAC secret and the token lifetime.
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // jsonwebtoken still accepts `exp == now` with zero leeway; `verify`
        // rejects that second itself.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issues a token for `user_id` and returns it with its decoded session.
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<(String, Session)> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;

        Ok((token, claims.into_session()?))
    }

    /// Verifies the signature and expiry of `token`.
    ///
    /// Every failure is reported as `AppError::Forbidden`.
    pub fn verify(&self, token: &str) -> Result<Session> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Forbidden("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::Forbidden("Invalid token signature".to_string())
                }
                _ => AppError::Forbidden("Invalid token".to_string()),
            }
        })?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AppError::Forbidden("Token has expired".to_string()));
        }

        data.claims.into_session()
    }
}
