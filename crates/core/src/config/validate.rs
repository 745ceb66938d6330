use reqwest::Url;

use super::{types::Config, ConfigError, MAX_INLINE_RESULTS};

/// Longest getUpdates timeout accepted by the Bot API.
const MAX_POLL_TIMEOUT_SECS: u32 = 50;

/// Validate configuration
/// Currently validates:
/// - Bot token is present
/// - API URLs are http(s)
/// - Result limits are usable and within Telegram's inline cap
/// - Server port is not 0 when the server is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.telegram.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "telegram.token is required (set COPELK_TELEGRAM__TOKEN or TELEGRAM_TOKEN)"
                .to_string(),
        ));
    }

    if config.telegram.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
        return Err(ConfigError::ValidationError(format!(
            "telegram.poll_timeout_secs cannot exceed {}",
            MAX_POLL_TIMEOUT_SECS
        )));
    }

    check_http_url("telegram.api_url", &config.telegram.api_url)?;
    check_http_url("subtitle_api.base_url", &config.subtitle_api.base_url)?;

    if config.subtitle_api.host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "subtitle_api.host cannot be empty".to_string(),
        ));
    }

    if config.limits.max_text_results == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_text_results must be at least 1".to_string(),
        ));
    }

    if config.limits.max_inline_results == 0
        || config.limits.max_inline_results > MAX_INLINE_RESULTS
    {
        return Err(ConfigError::ValidationError(format!(
            "limits.max_inline_results must be between 1 and {}",
            MAX_INLINE_RESULTS
        )));
    }

    if config.server.enabled && config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn check_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", field, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.telegram.token = "123:abc".to_string();
        config
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_missing_token_fails() {
        let config = Config::default();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("telegram.token"));
    }

    #[test]
    fn test_validate_inline_limit_above_platform_cap_fails() {
        let mut config = valid_config();
        config.limits.max_inline_results = 51;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_text_limit_fails() {
        let mut config = valid_config();
        config.limits.max_text_results = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_base_url_fails() {
        let mut config = valid_config();
        config.subtitle_api.base_url = "ftp://example.com/api".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("subtitle_api.base_url"));

        config.subtitle_api.base_url = "not a url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_port_zero_fails_only_when_enabled() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());

        config.server.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_poll_timeout_cap() {
        let mut config = valid_config();
        config.telegram.poll_timeout_secs = 60;
        assert!(validate_config(&config).is_err());
    }
}
