//! Configuration management for the AgriHelp service.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (agrihelp.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win over earlier ones.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all options that affect service behavior across the
/// HTTP server and the CLI commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Storage backend configuration
    pub database: DatabaseConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Optional generative-answer configuration
    pub generator: GeneratorConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Storage backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend identifier: "sqlite" or "none"
    pub backend: String,

    /// Path to the SQLite database file
    pub path: PathBuf,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Timeout for a single storage or knowledge operation, in milliseconds.
    /// On timeout the pipeline degrades instead of failing the request.
    pub op_timeout_ms: u64,
}

/// Generative-answer provider settings.
///
/// Disabled by default; when enabled, a cache miss first attempts a
/// generated answer before falling back to template synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Whether generative enrichment is attempted at all
    pub enabled: bool,

    /// Provider identifier (currently "ollama")
    pub provider: String,

    /// Provider endpoint URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Timeout for one generation call, in milliseconds
    pub timeout_ms: u64,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseFileConfig>,
    server: Option<ServerFileConfig>,
    generator: Option<GeneratorFileConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatabaseFileConfig {
    backend: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerFileConfig {
    host: Option<String>,
    port: Option<u16>,
    op_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeneratorFileConfig {
    enabled: Option<bool>,
    provider: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            database: DatabaseConfig {
                backend: "sqlite".to_string(),
                path: PathBuf::from("agrihelp.db"),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8001,
                op_timeout_ms: 2_000,
            },
            generator: GeneratorConfig {
                enabled: false,
                provider: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                timeout_ms: 15_000,
            },
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `AGRIHELP_CONFIG`: Path to config file
    /// - `AGRIHELP_DB_BACKEND`: Storage backend ("sqlite", "none")
    /// - `AGRIHELP_DB_PATH`: SQLite database path
    /// - `AGRIHELP_HOST` / `AGRIHELP_PORT`: Bind address
    /// - `AGRIHELP_GENERATOR`: Generator provider; setting it enables generation
    /// - `AGRIHELP_GENERATOR_ENDPOINT` / `AGRIHELP_GENERATOR_MODEL`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("AGRIHELP_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("agrihelp.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(backend) = std::env::var("AGRIHELP_DB_BACKEND") {
            config.database.backend = backend;
        }

        if let Ok(path) = std::env::var("AGRIHELP_DB_PATH") {
            config.database.path = PathBuf::from(path);
        }

        if let Ok(host) = std::env::var("AGRIHELP_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("AGRIHELP_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid AGRIHELP_PORT: {}", port)))?;
        }

        if let Ok(provider) = std::env::var("AGRIHELP_GENERATOR") {
            config.generator.provider = provider;
            config.generator.enabled = true;
        }

        if let Ok(endpoint) = std::env::var("AGRIHELP_GENERATOR_ENDPOINT") {
            config.generator.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("AGRIHELP_GENERATOR_MODEL") {
            config.generator.model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(db) = config_file.database {
            if let Some(backend) = db.backend {
                result.database.backend = backend;
            }
            if let Some(path) = db.path {
                result.database.path = PathBuf::from(path);
            }
        }

        if let Some(server) = config_file.server {
            if let Some(host) = server.host {
                result.server.host = host;
            }
            if let Some(port) = server.port {
                result.server.port = port;
            }
            if let Some(timeout) = server.op_timeout_ms {
                result.server.op_timeout_ms = timeout;
            }
        }

        if let Some(generator) = config_file.generator {
            if let Some(enabled) = generator.enabled {
                result.generator.enabled = enabled;
            }
            if let Some(provider) = generator.provider {
                result.generator.provider = provider;
            }
            if let Some(endpoint) = generator.endpoint {
                result.generator.endpoint = endpoint;
            }
            if let Some(model) = generator.model {
                result.generator.model = model;
            }
            if let Some(timeout) = generator.timeout_ms {
                result.generator.timeout_ms = timeout;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(db_path) = db_path {
            self.database.path = db_path;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        let known_backends = ["sqlite", "none"];
        if !known_backends.contains(&self.database.backend.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown storage backend: {}. Supported: {}",
                self.database.backend,
                known_backends.join(", ")
            )));
        }

        let known_providers = ["ollama"];
        if self.generator.enabled && !known_providers.contains(&self.generator.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown generator provider: {}. Supported: {}",
                self.generator.provider,
                known_providers.join(", ")
            )));
        }

        if self.server.op_timeout_ms == 0 {
            return Err(AppError::Config(
                "Operation timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.server.port, 8001);
        assert!(!config.generator.enabled);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            Some(PathBuf::from("/tmp/cache.db")),
            None,
            true,
            false,
        );

        assert_eq!(overridden.database.path, PathBuf::from("/tmp/cache.db"));
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_backend() {
        let mut config = AppConfig::default();
        config.database.backend = "mongodb".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_none_backend() {
        let mut config = AppConfig::default();
        config.database.backend = "none".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_disabled_generator_skips_provider_check() {
        let mut config = AppConfig::default();
        config.generator.provider = "not-a-provider".to_string();
        config.generator.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_yaml() {
        let yaml = r#"
database:
  backend: none
server:
  port: 9090
generator:
  enabled: true
  model: mistral
logging:
  level: warn
"#;
        let dir = std::env::temp_dir().join("agrihelp-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("agrihelp.yaml");
        std::fs::write(&path, yaml).unwrap();

        let mut config = AppConfig::default();
        let merged = config.merge_yaml(&path).unwrap();

        assert_eq!(merged.database.backend, "none");
        assert_eq!(merged.server.port, 9090);
        assert!(merged.generator.enabled);
        assert_eq!(merged.generator.model, "mistral");
        assert_eq!(merged.log_level, Some("warn".to_string()));
        // Untouched values keep their defaults
        assert_eq!(merged.server.host, "127.0.0.1");
    }
}
