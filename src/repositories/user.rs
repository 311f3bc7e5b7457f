use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::{
    db::is_unique_violation,
    error::{AppError, Result},
    models::user::{NewUser, User},
};

/// Persistence for registered users.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Inserts a user. Fails with `DuplicateUsername` if the name is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Finds a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// `UserStore` backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (id, username, password_hash, role)
                VALUES ($1, $2, $3, $4)
                RETURNING id, username, password_hash, role, created_at
                "#,
                &[&user.id, &user.username, &user.password_hash, &user.role.as_str()],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::DuplicateUsername
                } else {
                    AppError::from(e)
                }
            })?;
        User::try_from(&row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, username, password_hash, role, created_at
                FROM users
                WHERE username = $1
                "#,
                &[&username],
            )
            .await?;
        row.map(|r| User::try_from(&r)).transpose()
    }
}
