//! In-process stores used by the router and service tests.

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::{
        employee::{Employee, EmployeeChanges, NewEmployee},
        user::{NewUser, User},
    },
    repositories::{employee::EmployeeStore, user::UserStore},
    state::AppState,
};

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        db_pool_size: 1,
        bind_addr: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        jwt_secret: Zeroizing::new(b"test-secret-that-is-long-enough-for-hs256".to_vec()),
        token_ttl_minutes: 60,
        cors_origins: vec!["http://localhost:5173".to_string()],
        admin_only_mutations: false,
        static_dir: None,
    }
}

/// An `AppState` over empty in-memory stores.
pub fn test_state(config: &Config) -> AppState {
    AppState::with_stores(
        config,
        Arc::new(MemoryUserStore::default()),
        Arc::new(MemoryEmployeeStore::default()),
    )
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUsername);
        }
        let user = User {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct MemoryEmployeeStore {
    employees: RwLock<Vec<Employee>>,
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        Ok(self.employees.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, id: Uuid, employee: &NewEmployee) -> Result<Employee> {
        let mut employees = self.employees.write().await;
        if employees.iter().any(|e| e.email == employee.email) {
            return Err(AppError::DuplicateEmail);
        }
        let now = Utc::now();
        let employee = Employee {
            id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            salary: employee.salary,
            date_of_joining: employee.date_of_joining,
            created_at: now,
            updated_at: now,
        };
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn update(&self, id: Uuid, changes: &EmployeeChanges) -> Result<Option<Employee>> {
        let mut employees = self.employees.write().await;
        if let Some(email) = &changes.email {
            if employees.iter().any(|e| e.id != id && &e.email == email) {
                return Err(AppError::DuplicateEmail);
            }
        }
        let Some(employee) = employees.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        apply_changes(employee, changes);
        employee.updated_at = Utc::now();
        Ok(Some(employee.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut employees = self.employees.write().await;
        let before = employees.len();
        employees.retain(|e| e.id != id);
        Ok(employees.len() < before)
    }
}

fn apply_changes(employee: &mut Employee, changes: &EmployeeChanges) {
    if let Some(first_name) = &changes.first_name {
        employee.first_name = first_name.clone();
    }
    if let Some(last_name) = &changes.last_name {
        employee.last_name = last_name.clone();
    }
    if let Some(email) = &changes.email {
        employee.email = email.clone();
    }
    if let Some(position) = &changes.position {
        employee.position = position.clone();
    }
    if let Some(department) = &changes.department {
        employee.department = department.clone();
    }
    if let Some(salary) = changes.salary {
        employee.salary = salary;
    }
    if let Some(date_of_joining) = changes.date_of_joining {
        employee.date_of_joining = date_of_joining;
    }
}
