//! Configuration management for the Glance API
//!
//! Settings are resolved once at startup from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlanceConfig {
    /// Environment label (development, production, ...)
    pub environment: String,
    /// Server configuration
    pub server: ServerConfig,
    /// Kubernetes connection configuration
    pub kubernetes: KubernetesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address as `host:port`; `:8080` binds every interface
    pub address: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown
    pub shutdown_grace_secs: u64,
    /// Answer failed operations with the control plane's 404/409/403
    pub remote_status_passthrough: bool,
    /// Origins allowed by CORS; `"*"` allows any
    pub cors_allowed_origins: Vec<String>,
}

/// Kubernetes connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Path to kubeconfig, used when no token is set
    pub kubeconfig: PathBuf,
    /// Kubeconfig context; current context when unset
    pub context: Option<String>,
    /// API server URL for bearer token access
    pub host: String,
    /// Bearer token; takes precedence over the kubeconfig file
    pub token: Option<String>,
    /// Skip TLS verification on the token path
    pub insecure_skip_tls_verify: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// JSON console output; defaults to on in production
    pub json: Option<bool>,
    /// Directory for daily-rolling log files
    pub file_dir: Option<PathBuf>,
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            kubernetes: KubernetesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ":8080".to_string(),
            request_timeout_secs: 15,
            shutdown_grace_secs: 5,
            remote_status_passthrough: false,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            kubeconfig: PathBuf::from(home).join(".kube").join("config"),
            context: None,
            host: "http://localhost:9000".to_string(),
            token: None,
            insecure_skip_tls_verify: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: None,
            file_dir: None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl GlanceConfig {
    /// Load configuration from the config file and environment, then validate
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("GLANCE_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/k8s-glance/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides through `lookup`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(env) = lookup("ENV") {
            self.environment = env;
        }

        // Server
        if let Some(address) = lookup("SERVER_ADDRESS") {
            self.server.address = address;
        }
        if let Some(enabled) = lookup("GLANCE_REMOTE_STATUS_PASSTHROUGH").and_then(|v| parse_bool(&v)) {
            self.server.remote_status_passthrough = enabled;
        }
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            self.server.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        // Kubernetes
        if let Some(path) = lookup("KUBECONFIG") {
            self.kubernetes.kubeconfig = PathBuf::from(path);
        }
        if let Some(host) = lookup("K8S_HOST") {
            self.kubernetes.host = host;
        }
        if let Some(token) = lookup("K8S_TOKEN").filter(|t| !t.is_empty()) {
            self.kubernetes.token = Some(token);
        }
        if let Some(insecure) = lookup("K8S_INSECURE").and_then(|v| parse_bool(&v)) {
            self.kubernetes.insecure_skip_tls_verify = insecure;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_ascii_lowercase();
        }
        if let Some(json) = lookup("LOG_JSON").and_then(|v| parse_bool(&v)) {
            self.logging.json = Some(json);
        }
        if let Some(dir) = lookup("LOG_DIR") {
            self.logging.file_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Whether console logs are emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or_else(|| self.is_production())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Server address cannot be empty".to_string(),
            ));
        }
        self.server.listen_addr()?;

        if self.server.cors_allowed_origins.is_empty() {
            return Err(ConfigError::Validation(
                "At least one CORS origin must be allowed".to_string(),
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Request timeout must be greater than 0".to_string(),
            ));
        }
        if self.server.shutdown_grace_secs == 0 {
            return Err(ConfigError::Validation(
                "Shutdown grace period must be greater than 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Address to bind, as `host:port`
    ///
    /// A bare `:port` binds every interface. The host may be a name such as
    /// `localhost`; it is resolved when the listener binds.
    pub fn listen_addr(&self) -> Result<String, ConfigError> {
        let address = self.address.trim();
        let invalid = |reason: &str| {
            ConfigError::Validation(format!(
                "Invalid server address '{}': {}",
                self.address, reason
            ))
        };

        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected host:port"))?;
        port.parse::<u16>().map_err(|_| invalid("invalid port"))?;

        let host = if host.is_empty() { "0.0.0.0" } else { host };
        Ok(format!("{}:{}", host, port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Config validation failed: {0}")]
    Validation(String),
}
