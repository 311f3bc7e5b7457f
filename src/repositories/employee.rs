use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    db::is_unique_violation,
    error::{AppError, Result},
    models::employee::{Employee, EmployeeChanges, NewEmployee},
};

const COLUMNS: &str = "id, first_name, last_name, email, position, department, salary, \
                       date_of_joining, created_at, updated_at";

/// Persistence for employee records.
///
/// Each method is a single statement; the store's row semantics settle
/// concurrent writers.
#[async_trait]
pub trait EmployeeStore: Send + Sync + 'static {
    /// Every employee, oldest first.
    async fn list(&self) -> Result<Vec<Employee>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>>;

    /// Inserts a record. Fails with `DuplicateEmail` if the email is taken.
    async fn insert(&self, id: Uuid, employee: &NewEmployee) -> Result<Employee>;

    /// Applies `changes` and returns the updated record, or `None` if `id` is absent.
    async fn update(&self, id: Uuid, changes: &EmployeeChanges) -> Result<Option<Employee>>;

    /// Removes a record. Returns `false` if `id` is absent.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

fn map_write_error(e: tokio_postgres::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::DuplicateEmail
    } else {
        AppError::from(e)
    }
}

/// `EmployeeStore` backed by the `employees` table.
#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: Pool,
}

impl PgEmployeeStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM employees ORDER BY created_at, id", COLUMNS);
        let rows = client.query(sql.as_str(), &[]).await?;
        Ok(rows.iter().map(Employee::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM employees WHERE id = $1", COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(Employee::from))
    }

    async fn insert(&self, id: Uuid, employee: &NewEmployee) -> Result<Employee> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            INSERT INTO employees
                (id, first_name, last_name, email, position, department, salary, date_of_joining)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &id,
                    &employee.first_name,
                    &employee.last_name,
                    &employee.email,
                    &employee.position,
                    &employee.department,
                    &employee.salary,
                    &employee.date_of_joining,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(Employee::from(&row))
    }

    async fn update(&self, id: Uuid, changes: &EmployeeChanges) -> Result<Option<Employee>> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            UPDATE employees
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                position = COALESCE($5, position),
                department = COALESCE($6, department),
                salary = COALESCE($7, salary),
                date_of_joining = COALESCE($8, date_of_joining),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = client
            .query_opt(
                sql.as_str(),
                &[
                    &id,
                    &changes.first_name,
                    &changes.last_name,
                    &changes.email,
                    &changes.position,
                    &changes.department,
                    &changes.salary,
                    &changes.date_of_joining,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(row.as_ref().map(Employee::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM employees WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }
}
