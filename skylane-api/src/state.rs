use skylane_store::DbClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    /// Token lifetime in minutes, fixed at process start.
    pub token_minutes: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub auth: AuthConfig,
}
