use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Report provider configuration, immutable after startup
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// "gemini", "openai" or "mock"
    #[serde(default = "default_provider")]
    pub name: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Upper bound on one outbound provider call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider(),
            gemini_api_key: None,
            openai_api_key: None,
            openai_model: default_openai_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "mock".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LICENSURE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with LICENSURE_)
            // e.g., LICENSURE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LICENSURE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Plain env vars (.env style) override the provider section
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LICENSURE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the short-form environment variables the deployment uses:
/// PROVIDER, GEMINI_API_KEY, OPENAI_API_KEY, OPENAI_MODEL.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let provider = env::var("PROVIDER").ok().filter(|v| !v.trim().is_empty());
    let gemini_key = env::var("GEMINI_API_KEY").ok().filter(|v| !v.trim().is_empty());
    let openai_key = env::var("OPENAI_API_KEY").ok().filter(|v| !v.trim().is_empty());
    let openai_model = env::var("OPENAI_MODEL").ok().filter(|v| !v.trim().is_empty());

    let mut builder = Config::builder().add_source(settings);

    if let Some(provider) = provider {
        builder = builder.set_override("provider.name", provider)?;
    }
    if let Some(key) = gemini_key {
        builder = builder.set_override("provider.gemini_api_key", key)?;
    }
    if let Some(key) = openai_key {
        builder = builder.set_override("provider.openai_api_key", key)?;
    }
    if let Some(model) = openai_model {
        builder = builder.set_override("provider.openai_model", model)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_settings() {
        let provider = ProviderSettings::default();
        assert_eq!(provider.name, "mock");
        assert_eq!(provider.openai_model, "gpt-4o-mini");
        assert_eq!(provider.timeout_secs, 30);
        assert!(provider.gemini_api_key.is_none());
    }

    #[test]
    fn test_default_server_settings() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8000);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_reads_logging_section() {
        let path = std::env::temp_dir().join(format!("licensure-log-{}.toml", std::process::id()));
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\nformat = \"pretty\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, "pretty");
    }
}
