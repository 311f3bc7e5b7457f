use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::user::{NewUser, Role, User};
use crate::state::AppState;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 2;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;

/// What a successful login hands back to the client.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
    pub username: String,
}

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the PHC-formatted hash.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a hash.
///
/// The Argon2 parameters are read back from the PHC string, so hashes made
/// with older cost settings keep verifying.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(result)
}

/// Registers a new user.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `username` - The user's login name.
/// * `password` - The user's plain-text password.
/// * `role` - The user's role.
///
/// # Returns
///
/// A `Result` containing the created `User`. Fails with
/// `DuplicateUsername` when the name is taken.
pub async fn register(
    state: &AppState,
    username: String,
    password: String,
    role: Role,
) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", username);

    // Argon2 is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    let user = state
        .users
        .insert(NewUser {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
        })
        .await?;

    tracing::info!("✅ User created with ID: {} ({})", user.id, user.role);
    Ok(user)
}

/// Authenticates a user and issues a session token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `username` - The user's login name.
/// * `password` - The user's plain-text password.
///
/// # Returns
///
/// A `Result` containing the token, role, and username. Fails with
/// `UserNotFound` or `InvalidCredentials`.
pub async fn login(state: &AppState, username: String, password: String) -> Result<LoginOutcome> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))??;

    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let (token, session) = state.tokens.issue(user.id, user.role)?;

    tracing::info!(
        "✅ User authenticated: {} (token expires {})",
        user.id,
        session.expires_at
    );

    Ok(LoginOutcome {
        token,
        role: user.role,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::{test_config, test_state};

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &first).unwrap());
        assert!(!verify_password("battery staple", &first).unwrap());
    }

    #[tokio::test]
    async fn register_then_login_yields_token_with_same_role() {
        let state = test_state(&test_config());

        let user = register(&state, "alice".into(), "s3cret!".into(), Role::Admin)
            .await
            .unwrap();
        assert_ne!(user.password_hash, "s3cret!");

        let outcome = login(&state, "alice".into(), "s3cret!".into()).await.unwrap();
        assert_eq!(outcome.role, Role::Admin);
        assert_eq!(outcome.username, "alice");

        let session = state.tokens.verify(&outcome.token).unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.role, Role::Admin);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let state = test_state(&test_config());
        register(&state, "bob".into(), "pw".into(), Role::Client).await.unwrap();

        let err = register(&state, "bob".into(), "other".into(), Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let state = test_state(&test_config());
        register(&state, "carol".into(), "right".into(), Role::Client).await.unwrap();

        for attempt in ["wrong", "", "Right", "right "] {
            let err = login(&state, "carol".into(), attempt.into()).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials), "{:?}", attempt);
        }
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let state = test_state(&test_config());
        let err = login(&state, "nobody".into(), "pw".into()).await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }
}
