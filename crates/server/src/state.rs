use copelk_core::{Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
