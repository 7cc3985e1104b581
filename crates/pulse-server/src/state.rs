use crate::config::ServerConfig;
use pulse_storage::MarketingStore;
use std::sync::Arc;

/// Shared handler state. The store handle is created once at startup and
/// lives until the server shuts down.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketingStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketingStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
