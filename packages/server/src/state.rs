use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::storage::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub media: Arc<dyn MediaStore>,
    /// Shared client for outbound OAuth calls.
    pub http: reqwest::Client,
}
