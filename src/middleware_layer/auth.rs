use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    models::{session::Session, user::Role},
    state::AppState,
};

/// Something a protected route does on behalf of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadEmployees,
    WriteEmployees,
    ViewAnalytics,
}

/// Which roles may perform which actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Every authenticated role may perform every action.
    ///
    /// The client UI hides mutation controls from `client` users, but the
    /// server does not enforce that.
    Shared,
    /// Only admins may create, update, or delete employees.
    AdminWrites,
}

/// The authorization predicate every protected route consults.
pub fn is_permitted(policy: AccessPolicy, role: Role, action: Action) -> bool {
    match (policy, action) {
        (AccessPolicy::Shared, _) => true,
        (AccessPolicy::AdminWrites, Action::WriteEmployees) => role == Role::Admin,
        (AccessPolicy::AdminWrites, Action::ReadEmployees | Action::ViewAnalytics) => true,
    }
}

/// Fails with `Forbidden` unless `session` may perform `action`.
pub fn authorize(state: &AppState, session: &Session, action: Action) -> Result<()> {
    if is_permitted(state.policy, session.role, action) {
        Ok(())
    } else {
        tracing::warn!(
            "❌ {:?} denied for user {} ({})",
            action,
            session.user_id,
            session.role
        );
        Err(AppError::Forbidden(format!(
            "Role '{}' may not perform this action",
            session.role
        )))
    }
}

/// Extracts the bearer token from the `Authorization` header.
///
/// # Arguments
///
/// * `request` - The incoming request.
///
/// # Returns
///
/// An `Option` containing the token if the header carries one.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// A middleware that requires a valid bearer token.
///
/// Missing tokens are `Unauthenticated` (401); tokens that fail signature or
/// expiry checks are `Forbidden` (403). On success the decoded `Session` is
/// inserted into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    tracing::debug!("🔐 Checking authentication...");

    let token = extract_bearer_token(&request).ok_or_else(|| {
        tracing::warn!("❌ No bearer token on {}", request.uri().path());
        AppError::Unauthenticated
    })?;

    let session = state.tokens.verify(token)?;

    tracing::debug!("✅ User authenticated: {} ({})", session.user_id, session.role);

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/employees");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_is_extracted() {
        let request = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&request), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_headers_yield_nothing() {
        assert_eq!(extract_bearer_token(&request_with(None)), None);
        assert_eq!(extract_bearer_token(&request_with(Some("Bearer"))), None);
        assert_eq!(extract_bearer_token(&request_with(Some("Bearer   "))), None);
        assert_eq!(extract_bearer_token(&request_with(Some("Basic dXNlcjpwYXNz"))), None);
    }

    #[test]
    fn shared_policy_permits_every_role() {
        for role in [Role::Admin, Role::Client] {
            for action in [Action::ReadEmployees, Action::WriteEmployees, Action::ViewAnalytics] {
                assert!(is_permitted(AccessPolicy::Shared, role, action));
            }
        }
    }

    #[test]
    fn admin_writes_policy_blocks_client_mutations_only() {
        let policy = AccessPolicy::AdminWrites;
        assert!(is_permitted(policy, Role::Admin, Action::WriteEmployees));
        assert!(!is_permitted(policy, Role::Client, Action::WriteEmployees));
        assert!(is_permitted(policy, Role::Client, Action::ReadEmployees));
        assert!(is_permitted(policy, Role::Client, Action::ViewAnalytics));
    }
}
