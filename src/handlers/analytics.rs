use axum::{extract::State, Extension, Json};

use crate::{
    error::Result,
    middleware_layer::auth::{Action, authorize},
    models::{analytics::Analytics, session::Session},
    services::analytics as analytics_service,
    state::AppState,
};

/// Department counts and average salaries over the whole employee set.
#[axum::debug_handler]
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Analytics>> {
    authorize(&state, &session, Action::ViewAnalytics)?;
    let analytics = analytics_service::compute_analytics(&state).await?;
    Ok(Json(analytics))
}
