use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::Tables;
use crate::views::ViewSettings;

/// Shared handler state. The tables are loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<Tables>,
    pub settings: ViewSettings,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(tables: Tables, config: &AppConfig) -> Self {
        Self {
            tables: Arc::new(tables),
            settings: config.view_settings(),
            cors_origin: config.server.cors_origin.clone(),
        }
    }
}
