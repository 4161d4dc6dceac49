use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {key}")]
    Missing { key: String },

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// HTTP server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
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

    /// Maximum accepted request body, in bytes
    #[validate(range(
        min = 1024,
        max = 16777216,
        message = "Body limit must be between 1 KiB and 16 MiB"
    ))]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8000,
            max_body_bytes: 65536,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("FLIGHTGRAPH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("FLIGHTGRAPH_PORT", "8000")?,
            max_body_bytes: parse_env_var("FLIGHTGRAPH_MAX_BODY_BYTES", "65536")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        http_host: Option<String>,
        http_port: Option<u16>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = http_host {
            self.http_host = host;
        }
        if let Some(port) = http_port {
            self.http_port = port;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Neo4j connection settings.
///
/// The password has no default; it must come from `NEO4J_PASSWORD`.
#[derive(Clone, Validate, Serialize, Deserialize)]
pub struct GraphStoreConfig {
    #[validate(length(min = 1, message = "Neo4j URI cannot be empty"))]
    pub uri: String,

    #[validate(length(min = 1, message = "Neo4j user cannot be empty"))]
    pub user: String,

    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "Neo4j password cannot be empty"))]
    pub password: String,

    #[validate(length(min = 1, message = "Neo4j database cannot be empty"))]
    pub database: String,

    #[validate(range(
        min = 1,
        max = 64,
        message = "Neo4j pool size must be between 1 and 64"
    ))]
    pub max_connections: usize,
}

impl std::fmt::Debug for GraphStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStoreConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl GraphStoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            uri: env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            password: require_env_var("NEO4J_PASSWORD")?,
            database: env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string()),
            max_connections: parse_env_var("NEO4J_MAX_CONNECTIONS", "4")?,
        };

        config.validate()?;
        Ok(config)
    }
}

/// MongoDB connection settings
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    #[validate(length(min = 1, message = "MongoDB URI cannot be empty"))]
    pub uri: String,

    #[validate(length(min = 1, message = "MongoDB database cannot be empty"))]
    pub database: String,

    #[validate(length(min = 1, message = "MongoDB collection cannot be empty"))]
    pub collection: String,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "flights".to_string(),
            collection: "flight".to_string(),
        }
    }
}

impl DocumentStoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            uri: env::var("MONGODB_URI").unwrap_or(defaults.uri),
            database: env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
            collection: env::var("MONGODB_COLLECTION").unwrap_or(defaults.collection),
        };

        config.validate()?;
        Ok(config)
    }
}

fn require_env_var(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing {
            key: key.to_string(),
        }),
    }
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
