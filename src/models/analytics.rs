use serde::Serialize;

/// One bar of the department chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCount {
    pub name: String,
    pub value: u64,
}

/// One bar of the salary chart: the rounded average salary of a department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSalary {
    pub name: String,
    pub salary: i64,
}

/// The body of `GET /api/analytics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Employees per department, in first-seen order.
    pub department_chart: Vec<DepartmentCount>,
    /// Average salary per department, same order as `department_chart`.
    pub salary_chart: Vec<DepartmentSalary>,
    pub total_employees: u64,
}
