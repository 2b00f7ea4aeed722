use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Prefix for column detail links: `{route_prefix}/nodes/{column_id}`
    #[validate(custom(function = "validate_route_prefix"))]
    pub route_prefix: String,

    /// Snapshot file loaded at startup
    pub snapshot_path: Option<String>,

    /// Maximum accepted request body (snapshot uploads)
    #[validate(range(
        min = 1024,
        max = 536870912,
        message = "Max body size must be between 1 KiB and 512 MiB"
    ))]
    pub max_body_bytes: usize,

    /// Per-request timeout in seconds
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Request timeout must be between 1 and 3600 seconds"
    ))]
    pub request_timeout_secs: u64,

    /// Whether to run server in daemon mode
    pub daemon: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            route_prefix: String::new(),
            snapshot_path: None,
            max_body_bytes: 64 * 1024 * 1024,
            request_timeout_secs: 30,
            daemon: false,
        }
    }
}

/// Empty, or starts with `/` and has no trailing `/`
fn validate_route_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() {
        return Ok(());
    }
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        let mut error = ValidationError::new("route_prefix");
        error.message =
            Some("Route prefix must start with '/' and must not end with '/'".into());
        return Err(error);
    }
    Ok(())
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("TABLEGRAPH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("TABLEGRAPH_PORT", "8080")?,
            route_prefix: env::var("TABLEGRAPH_ROUTE_PREFIX").unwrap_or_default(),
            snapshot_path: env::var("TABLEGRAPH_SNAPSHOT").ok(),
            max_body_bytes: parse_env_var("TABLEGRAPH_MAX_BODY_BYTES", "67108864")?,
            request_timeout_secs: parse_env_var("TABLEGRAPH_REQUEST_TIMEOUT_SECS", "30")?,
            daemon: false, // Environment-based config always runs in foreground
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    ///
    /// Flags left unset fall back to the defaults.
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        Self::default().with_cli(cli)
    }

    /// Override this configuration with every flag the CLI set, then validate
    pub fn with_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(http_host) = cli.http_host {
            self.http_host = http_host;
        }
        if let Some(http_port) = cli.http_port {
            self.http_port = http_port;
        }
        if let Some(route_prefix) = cli.route_prefix {
            self.route_prefix = route_prefix;
        }
        if cli.snapshot_path.is_some() {
            self.snapshot_path = cli.snapshot_path;
        }
        if let Some(max_body_bytes) = cli.max_body_bytes {
            self.max_body_bytes = max_body_bytes;
        }
        if let Some(request_timeout_secs) = cli.request_timeout_secs {
            self.request_timeout_secs = request_timeout_secs;
        }
        self.daemon |= cli.daemon;

        self.validate()?;
        Ok(self)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (CLI overrides environment)
    ///
    /// `snapshot_path` is only replaced when the other side sets one.
    pub fn merge(&mut self, other: Self) {
        self.http_host = other.http_host;
        self.http_port = other.http_port;
        self.route_prefix = other.route_prefix;
        if other.snapshot_path.is_some() {
            self.snapshot_path = other.snapshot_path;
        }
        self.max_body_bytes = other.max_body_bytes;
        self.request_timeout_secs = other.request_timeout_secs;
        self.daemon = other.daemon;
    }
}

/// CLI configuration (parsed from command line arguments); `None` means unset
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub http_host: Option<String>,
    pub http_port: Option<u16>,
    pub route_prefix: Option<String>,
    pub snapshot_path: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub daemon: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
