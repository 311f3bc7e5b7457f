use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::employee::{Employee, EmployeeChanges, NewEmployee},
    state::AppState,
};

/// Lists every employee.
pub async fn list_employees(state: &AppState) -> Result<Vec<Employee>> {
    state.employees.list().await
}

/// Gets one employee, or `NotFound`.
pub async fn get_employee(state: &AppState, employee_id: Uuid) -> Result<Employee> {
    state
        .employees
        .find_by_id(employee_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Creates a new employee.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `employee` - The validated employee fields.
///
/// # Returns
///
/// A `Result` containing the created `Employee` with its generated id.
pub async fn create_employee(state: &AppState, employee: NewEmployee) -> Result<Employee> {
    let employee_id = Uuid::new_v4();

    let created = state.employees.insert(employee_id, &employee).await?;
    tracing::info!("✅ Employee created with ID: {}", created.id);
    Ok(created)
}

/// Overwrites the provided fields of an employee.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `employee_id` - The ID of the employee.
/// * `changes` - The validated fields to overwrite.
///
/// # Returns
///
/// A `Result` containing the updated `Employee`, or `NotFound`.
pub async fn update_employee(
    state: &AppState,
    employee_id: Uuid,
    changes: EmployeeChanges,
) -> Result<Employee> {
    let updated = state
        .employees
        .update(employee_id, &changes)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!("✅ Employee updated: {}", employee_id);
    Ok(updated)
}

/// Deletes an employee, or fails with `NotFound`.
pub async fn delete_employee(state: &AppState, employee_id: Uuid) -> Result<()> {
    if !state.employees.delete(employee_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!("🗑️ Employee deleted: {}", employee_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::{test_config, test_state};
    use chrono::NaiveDate;

    fn new_employee(email: &str, department: &str, salary: f64) -> NewEmployee {
        NewEmployee {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: email.into(),
            position: "Engineer".into(),
            department: department.into(),
            salary,
            date_of_joining: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_update_delete_lifecycle() {
        let state = test_state(&test_config());

        let created = create_employee(&state, new_employee("grace@example.com", "Eng", 90000.0))
            .await
            .unwrap();
        let listed = list_employees(&state).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);

        let changes = EmployeeChanges {
            position: Some("Rear Admiral".into()),
            salary: Some(150000.0),
            ..Default::default()
        };
        let updated = update_employee(&state, created.id, changes).await.unwrap();
        assert_eq!(updated.position, "Rear Admiral");
        assert_eq!(updated.salary, 150000.0);
        assert_eq!(updated.email, created.email);
        assert_eq!(get_employee(&state, created.id).await.unwrap(), updated);

        delete_employee(&state, created.id).await.unwrap();
        assert!(list_employees(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let state = test_state(&test_config());
        create_employee(&state, new_employee("dup@example.com", "Eng", 1.0))
            .await
            .unwrap();

        let err = create_employee(&state, new_employee("dup@example.com", "Sales", 2.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let state = test_state(&test_config());
        let missing = Uuid::new_v4();

        assert!(matches!(get_employee(&state, missing).await, Err(AppError::NotFound)));
        assert!(matches!(
            update_employee(&state, missing, EmployeeChanges::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(delete_employee(&state, missing).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let state = test_state(&test_config());
        let created = create_employee(&state, new_employee("once@example.com", "Ops", 5.0))
            .await
            .unwrap();

        delete_employee(&state, created.id).await.unwrap();
        assert!(matches!(delete_employee(&state, created.id).await, Err(AppError::NotFound)));
    }
}
