use config::{Config, ConfigError, Environment};
use serde::Deserialize;

fn default_database_url() -> String {
    "sqlite://data/tech-mandates.db".to_string()
}

fn default_auth_secret() -> String {
    "dev-secret-change-me".to_string()
}

fn default_token_expiry() -> u64 {
    86_400
}

fn default_cors() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:8081".to_string(),
    ]
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_scan_delay_min_ms() -> u64 {
    1_000
}

fn default_scan_delay_max_ms() -> u64 {
    3_000
}

fn default_server_port() -> u16 {
    8000
}

/// Application settings, loaded from defaults plus the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// HS256 signing secret for bearer tokens.
    #[serde(default = "default_auth_secret")]
    pub auth_secret: String,

    #[serde(default = "default_token_expiry")]
    pub auth_token_expiry_seconds: u64,

    #[serde(default = "default_cors")]
    pub cors_allow_origins: Vec<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    /// Bounds for the simulated scan latency. The mock scanners sleep a
    /// uniformly random duration inside this window.
    #[serde(default = "default_scan_delay_min_ms")]
    pub scan_delay_min_ms: u64,

    #[serde(default = "default_scan_delay_max_ms")]
    pub scan_delay_max_ms: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::new_with_env_file(true)
    }

    pub fn new_with_env_file(load_env_file: bool) -> Result<Self, ConfigError> {
        if load_env_file {
            dotenvy::dotenv().ok();
        }

        let config = Config::builder()
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allow_origins"),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_secret.len() < 8 {
            return Err(ConfigError::Message(
                "auth_secret must be at least 8 characters".to_string(),
            ));
        }
        if self.scan_delay_min_ms > self.scan_delay_max_ms {
            return Err(ConfigError::Message(
                "scan_delay_min_ms must not exceed scan_delay_max_ms".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_config_env() {
        for key in [
            "DATABASE_URL",
            "AUTH_SECRET",
            "AUTH_TOKEN_EXPIRY_SECONDS",
            "CORS_ALLOW_ORIGINS",
            "LOG_LEVEL",
            "LOG_FORMAT",
            "ENVIRONMENT",
            "SCAN_DELAY_MIN_MS",
            "SCAN_DELAY_MAX_MS",
            "SERVER_PORT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_settings() {
        clear_config_env();
        let settings = Settings::new_with_env_file(false).expect("default settings");

        assert_eq!(settings.database_url, "sqlite://data/tech-mandates.db");
        assert_eq!(settings.auth_token_expiry_seconds, 86_400);
        assert_eq!(settings.log_level, "INFO");
        assert_eq!(settings.log_format, "json");
        assert_eq!(settings.environment, "development");
        assert_eq!(settings.scan_delay_min_ms, 1_000);
        assert_eq!(settings.scan_delay_max_ms, 3_000);
        assert_eq!(settings.server_port, 8000);
        assert!(settings.cors_allow_origins.len() >= 1);
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut settings = Settings::new_with_env_file(false).unwrap();
        settings.auth_secret = "short".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_delay_window() {
        let mut settings = Settings::new_with_env_file(false).unwrap();
        settings.scan_delay_min_ms = 500;
        settings.scan_delay_max_ms = 100;
        assert!(settings.validate().is_err());
    }
}
