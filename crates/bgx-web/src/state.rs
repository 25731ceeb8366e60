use std::sync::Arc;

use bgx_core::BgxConfig;

/// Shared state for the upload handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BgxConfig>,
}

impl AppState {
    pub fn new(config: BgxConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}
