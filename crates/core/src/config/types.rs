use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Maximum number of records rendered in a plain-text search reply.
pub const MAX_TEXT_RESULTS: usize = 10;

/// Maximum number of inline results Telegram displays for one query.
pub const MAX_INLINE_RESULTS: usize = 50;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub subtitle_api: SubtitleApiConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot access token issued by BotFather.
    #[serde(default)]
    pub token: String,
    /// Bot API base URL (default: https://api.telegram.org)
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    /// Long-polling timeout passed to getUpdates (default: 30)
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_telegram_api_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u32 {
    30
}

/// Subtitle search API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubtitleApiConfig {
    /// API base URL, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Host substring that marks a pasted URL as a bulk-download link.
    #[serde(default = "default_api_host")]
    pub host: String,
    /// Optional request timeout. Unset means the HTTP client default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for SubtitleApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            host: default_api_host(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://bettercopelk.navinda.xyz/api".to_string()
}

fn default_api_host() -> String {
    "bettercopelk.navinda.xyz".to_string()
}

/// Reply size limits
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct LimitsConfig {
    #[serde(default = "default_max_text_results")]
    pub max_text_results: usize,
    #[serde(default = "default_max_inline_results")]
    pub max_inline_results: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_results: default_max_text_results(),
            max_inline_results: default_max_inline_results(),
        }
    }
}

fn default_max_text_results() -> usize {
    MAX_TEXT_RESULTS
}

fn default_max_inline_results() -> usize {
    MAX_INLINE_RESULTS
}

/// Operational HTTP server configuration (health, config, metrics)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_enabled")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: default_server_enabled(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_server_enabled() -> bool {
    true
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub telegram: SanitizedTelegramConfig,
    pub subtitle_api: SubtitleApiConfig,
    pub limits: LimitsConfig,
    pub server: ServerConfig,
}

/// Sanitized Telegram config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub api_url: String,
    pub token_configured: bool,
    pub poll_timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            telegram: SanitizedTelegramConfig {
                api_url: config.telegram.api_url.clone(),
                token_configured: !config.telegram.token.is_empty(),
                poll_timeout_secs: config.telegram.poll_timeout_secs,
            },
            subtitle_api: config.subtitle_api.clone(),
            limits: config.limits,
            server: config.server.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_platform_limits() {
        let config = Config::default();
        assert_eq!(config.limits.max_text_results, 10);
        assert_eq!(config.limits.max_inline_results, 50);
        assert_eq!(config.subtitle_api.base_url, "https://bettercopelk.navinda.xyz/api");
        assert!(config.subtitle_api.timeout_secs.is_none());
        assert_eq!(config.telegram.poll_timeout_secs, 30);
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let mut config = Config::default();
        config.telegram.token = "123:secret".to_string();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.telegram.token_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_sanitized_config_without_token() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(!sanitized.telegram.token_configured);
    }
}
