use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use garde::Validate;
use uuid::Uuid;

use crate::{
    error::Result,
    middleware_layer::auth::{Action, authorize},
    models::{
        employee::{Employee, EmployeeChanges, NewEmployee},
        session::Session,
    },
    services::employees as employee_service,
    state::AppState,
    validation::payload::{AppJson, AppPath},
};

/// Lists every employee.
#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Employee>>> {
    authorize(&state, &session, Action::ReadEmployees)?;
    let employees = employee_service::list_employees(&state).await?;
    Ok(Json(employees))
}

/// Gets one employee.
#[axum::debug_handler]
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppPath(employee_id): AppPath<Uuid>,
) -> Result<Json<Employee>> {
    authorize(&state, &session, Action::ReadEmployees)?;
    let employee = employee_service::get_employee(&state, employee_id).await?;
    Ok(Json(employee))
}

/// Creates a new employee.
#[axum::debug_handler]
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppJson(payload): AppJson<NewEmployee>,
) -> Result<impl IntoResponse> {
    authorize(&state, &session, Action::WriteEmployees)?;
    payload.validate()?;

    let employee = employee_service::create_employee(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Updates the provided fields of an employee.
#[axum::debug_handler]
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppPath(employee_id): AppPath<Uuid>,
    AppJson(payload): AppJson<EmployeeChanges>,
) -> Result<Json<Employee>> {
    authorize(&state, &session, Action::WriteEmployees)?;
    payload.validate()?;

    let employee = employee_service::update_employee(&state, employee_id, payload).await?;
    Ok(Json(employee))
}

/// Deletes an employee.
#[axum::debug_handler]
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    AppPath(employee_id): AppPath<Uuid>,
) -> Result<StatusCode> {
    authorize(&state, &session, Action::WriteEmployees)?;
    employee_service::delete_employee(&state, employee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
