use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides; nested keys use `__`
/// (e.g. `COPELK_SUBTITLE_API__BASE_URL`).
const ENV_PREFIX: &str = "COPELK_";

/// Unprefixed token variable understood for compatibility with older deployments.
const LEGACY_TOKEN_VAR: &str = "TELEGRAM_TOKEN";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path)))
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(Figment::from(Serialized::defaults(Config::default())))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(
            Env::raw()
                .only(&[LEGACY_TOKEN_VAR])
                .map(|_| "telegram.token".into()),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
