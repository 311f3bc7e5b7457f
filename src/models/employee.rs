use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Represents an employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// The unique identifier for the employee.
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all employees.
    pub email: String,
    pub position: String,
    pub department: String,
    /// Annual salary, never negative.
    pub salary: f64,
    pub date_of_joining: NaiveDate,
    /// The timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<&Row> for Employee {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            position: row.get("position"),
            department: row.get("department"),
            salary: row.get("salary"),
            date_of_joining: row.get("date_of_joining"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// The body of `POST /api/employees`: every field except the id.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[garde(length(min = 1, max = 255))]
    pub first_name: String,
    #[garde(length(min = 1, max = 255))]
    pub last_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1, max = 255))]
    pub position: String,
    #[garde(length(min = 1, max = 255))]
    pub department: String,
    #[garde(range(min = 0.0))]
    #[serde(deserialize_with = "deserialize_salary")]
    pub salary: f64,
    #[garde(skip)]
    pub date_of_joining: NaiveDate,
}

/// The body of `PUT /api/employees/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeChanges {
    #[garde(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[garde(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[garde(email)]
    pub email: Option<String>,
    #[garde(length(min = 1, max = 255))]
    pub position: Option<String>,
    #[garde(length(min = 1, max = 255))]
    pub department: Option<String>,
    #[garde(range(min = 0.0))]
    #[serde(default, deserialize_with = "deserialize_opt_salary")]
    pub salary: Option<f64>,
    #[garde(skip)]
    pub date_of_joining: Option<NaiveDate>,
}

/// A salary as sent by form clients: a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum SalaryInput {
    Number(f64),
    Text(String),
}

impl SalaryInput {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        let value = match self {
            SalaryInput::Number(value) => value,
            SalaryInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid salary \"{}\"", text)))?,
        };
        if !value.is_finite() {
            return Err(E::custom("salary must be a finite number"));
        }
        Ok(value)
    }
}

fn deserialize_salary<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    SalaryInput::deserialize(deserializer)?.into_f64()
}

fn deserialize_opt_salary<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<SalaryInput>::deserialize(deserializer)?
        .map(SalaryInput::into_f64)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_employee_json(email: &str, salary: f64) -> String {
        format!(
            r#"{{"firstName":"Ada","lastName":"Lovelace","email":"{}","position":"Engineer",
                "department":"Eng","salary":{},"dateOfJoining":"2024-03-01"}}"#,
            email, salary
        )
    }

    #[test]
    fn new_employee_reads_camel_case() {
        let employee: NewEmployee =
            sonic_rs::from_str(&new_employee_json("ada@example.com", 100000.0)).unwrap();
        assert_eq!(employee.first_name, "Ada");
        assert_eq!(employee.date_of_joining, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn malformed_email_fails_validation() {
        let employee: NewEmployee =
            sonic_rs::from_str(&new_employee_json("not-an-email", 100000.0)).unwrap();
        assert!(employee.validate().is_err());
    }

    #[test]
    fn negative_salary_fails_validation() {
        let employee: NewEmployee =
            sonic_rs::from_str(&new_employee_json("ada@example.com", -1.0)).unwrap();
        assert!(employee.validate().is_err());
    }

    #[test]
    fn salary_accepts_numeric_strings() {
        let body = r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com",
            "position":"Engineer","department":"Eng","salary":"50000","dateOfJoining":"2024-03-01"}"#;
        let employee: NewEmployee = sonic_rs::from_str(body).unwrap();
        assert_eq!(employee.salary, 50000.0);
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn non_numeric_salary_string_is_rejected() {
        let body = r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com",
            "position":"Engineer","department":"Eng","salary":"lots","dateOfJoining":"2024-03-01"}"#;
        assert!(sonic_rs::from_str::<NewEmployee>(body).is_err());
    }

    #[test]
    fn negative_salary_string_fails_validation() {
        let changes: EmployeeChanges = sonic_rs::from_str(r#"{"salary":"-10"}"#).unwrap();
        assert_eq!(changes.salary, Some(-10.0));
        assert!(changes.validate().is_err());
    }

    #[test]
    fn changes_salary_is_optional() {
        let changes: EmployeeChanges = sonic_rs::from_str(r#"{"position":"Lead"}"#).unwrap();
        assert_eq!(changes.salary, None);

        let changes: EmployeeChanges = sonic_rs::from_str(r#"{"salary":"72000.5"}"#).unwrap();
        assert_eq!(changes.salary, Some(72000.5));
    }

    #[test]
    fn empty_changes_are_valid() {
        assert!(EmployeeChanges::default().validate().is_ok());
    }

    #[test]
    fn changes_with_blank_department_are_rejected() {
        let changes = EmployeeChanges {
            department: Some(String::new()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }
}
