use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::password::{PasswordError, PasswordHasherConfig};
use crate::auth::TokenKeys;
use crate::config::AppConfig;

/// Shared handles every handler can reach through `State<AppState>`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pool: PgPool,
    pub keys: Arc<TokenKeys>,
    pub passwords: PasswordHasherConfig,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, PasswordError> {
        let keys = TokenKeys::new(&config.security.secret_key, config.security.token_expiry_hours);
        let passwords = PasswordHasherConfig::new(
            config.security.password_memory_kib,
            config.security.password_iterations,
        )?;

        Ok(Self {
            pool,
            keys: Arc::new(keys),
            passwords,
            config: Arc::new(config),
        })
    }
}
