use std::collections::HashMap;

use crate::{
    error::Result,
    models::{
        analytics::{Analytics, DepartmentCount, DepartmentSalary},
        employee::Employee,
    },
    state::AppState,
};

/// Reads every employee once and aggregates them. Nothing is cached.
pub async fn compute_analytics(state: &AppState) -> Result<Analytics> {
    let employees = state.employees.list().await?;
    let analytics = compute(&employees);

    tracing::debug!(
        "📊 Analytics over {} employees in {} departments",
        analytics.total_employees,
        analytics.department_chart.len()
    );
    Ok(analytics)
}

/// Groups `employees` by department in first-seen order.
pub fn compute(employees: &[Employee]) -> Analytics {
    struct Group<'a> {
        name: &'a str,
        count: u64,
        salary_sum: f64,
    }

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for employee in employees {
        let department = employee.department.as_str();
        let slot = *slots.entry(department).or_insert_with(|| {
            groups.push(Group {
                name: department,
                count: 0,
                salary_sum: 0.0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        group.salary_sum += employee.salary;
    }

    let department_chart = groups
        .iter()
        .map(|g| DepartmentCount {
            name: g.name.to_string(),
            value: g.count,
        })
        .collect();

    let salary_chart = groups
        .iter()
        .map(|g| DepartmentSalary {
            name: g.name.to_string(),
            salary: round_half_up(g.salary_sum / g.count as f64),
        })
        .collect();

    Analytics {
        department_chart,
        salary_chart,
        total_employees: employees.len() as u64,
    }
}

/// Rounds to the nearest integer. Averages are never negative, so rounding
/// halves away from zero is rounding them up.
fn round_half_up(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn employee(department: &str, salary: f64) -> Employee {
        let now = Utc::now();
        Employee {
            id: Uuid::new_v4(),
            first_name: "Test".into(),
            last_name: "Person".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            position: "Staff".into(),
            department: department.into(),
            salary,
            date_of_joining: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn count(name: &str, value: u64) -> DepartmentCount {
        DepartmentCount { name: name.into(), value }
    }

    fn salary(name: &str, salary: i64) -> DepartmentSalary {
        DepartmentSalary { name: name.into(), salary }
    }

    #[test]
    fn eng_and_sales_scenario() {
        let analytics = compute(&[
            employee("Eng", 100000.0),
            employee("Eng", 120000.0),
            employee("Sales", 80000.0),
        ]);

        assert_eq!(analytics.department_chart, vec![count("Eng", 2), count("Sales", 1)]);
        assert_eq!(analytics.salary_chart, vec![salary("Eng", 110000), salary("Sales", 80000)]);
        assert_eq!(analytics.total_employees, 3);
    }

    #[test]
    fn empty_set_yields_empty_charts() {
        let analytics = compute(&[]);
        assert!(analytics.department_chart.is_empty());
        assert!(analytics.salary_chart.is_empty());
        assert_eq!(analytics.total_employees, 0);
    }

    #[test]
    fn departments_keep_first_seen_order() {
        let analytics = compute(&[
            employee("Sales", 1.0),
            employee("Eng", 1.0),
            employee("Ops", 1.0),
            employee("Eng", 1.0),
            employee("Sales", 1.0),
        ]);

        let names: Vec<_> = analytics.department_chart.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Sales", "Eng", "Ops"]);
        let salary_names: Vec<_> = analytics.salary_chart.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(salary_names, names);
    }

    #[test]
    fn averages_round_half_up() {
        let analytics = compute(&[employee("Eng", 1.0), employee("Eng", 2.0)]);
        assert_eq!(analytics.salary_chart, vec![salary("Eng", 2)]);

        let analytics = compute(&[employee("Ops", 10.0), employee("Ops", 10.0), employee("Ops", 11.0)]);
        assert_eq!(analytics.salary_chart, vec![salary("Ops", 10)]);
    }

    #[test]
    fn rounding_has_no_float_artefacts() {
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497);
    }

    #[test]
    fn one_entry_per_distinct_department() {
        let employees: Vec<_> = (0..20)
            .map(|i| employee(&format!("Dept{}", i % 4), 1000.0 * i as f64))
            .collect();
        let analytics = compute(&employees);

        assert_eq!(analytics.department_chart.len(), 4);
        assert_eq!(analytics.salary_chart.len(), 4);
        assert_eq!(analytics.total_employees, 20);
        assert_eq!(analytics.department_chart.iter().map(|c| c.value).sum::<u64>(), 20);
        // Dept0 holds i = 0, 4, 8, 12, 16 → mean 8000.
        assert_eq!(analytics.salary_chart[0], salary("Dept0", 8000));
    }
}
