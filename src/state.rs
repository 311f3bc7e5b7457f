use std::sync::Arc;

use crate::config::Config;
use crate::crypto::token::TokenKeys;
use crate::error::Result;
use crate::middleware_layer::auth::AccessPolicy;
use crate::repositories::{
    employee::{EmployeeStore, PgEmployeeStore},
    user::{PgUserStore, UserStore},
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The credential store.
    pub users: Arc<dyn UserStore>,
    /// The employee store.
    pub employees: Arc<dyn EmployeeStore>,
    /// The application's configuration.
    pub config: Config,
    /// Signs and verifies session tokens.
    pub tokens: TokenKeys,
    /// Which roles may perform which actions.
    pub policy: AccessPolicy,
}

impl AppState {
    /// Creates a new `AppState` backed by PostgreSQL.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url, config.db_pool_size)?;
        tracing::info!("✅ PostgreSQL Pool initialized (max {} connections)", config.db_pool_size);

        crate::db::ensure_schema(&db).await?;

        Ok(Self::with_stores(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgEmployeeStore::new(db)),
        ))
    }

    /// Creates an `AppState` over the given stores.
    pub fn with_stores(
        config: &Config,
        users: Arc<dyn UserStore>,
        employees: Arc<dyn EmployeeStore>,
    ) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_minutes);
        tracing::info!("✅ Session tokens expire after {} minutes", config.token_ttl_minutes);

        let policy = if config.admin_only_mutations {
            AccessPolicy::AdminWrites
        } else {
            AccessPolicy::Shared
        };
        tracing::info!("✅ Access policy: {:?}", policy);

        AppState {
            users,
            employees,
            config: config.clone(),
            tokens,
            policy,
        }
    }
}
