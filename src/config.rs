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

    /// Path of the YAML schema declaring types and relationship paths
    #[validate(custom(function = "validate_schema_path"))]
    pub schema_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            schema_path: "schema.yaml".to_string(),
        }
    }
}

fn validate_schema_path(path: &str) -> Result<(), ValidationError> {
    if path.ends_with(".yaml") || path.ends_with(".yml") {
        Ok(())
    } else {
        let mut error = ValidationError::new("schema_path");
        error.message = Some("Schema path must point to a .yaml or .yml file".into());
        Err(error)
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("EDGEPATH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("EDGEPATH_PORT", "8080")?,
            schema_path: env::var("EDGEPATH_SCHEMA").unwrap_or_else(|_| "schema.yaml".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from a YAML file, or from the environment when no
    /// file is given, then apply the CLI arguments that were passed
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = match &cli.config_file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::from_env()?,
        };
        config.merge(cli);

        config.validate()?;
        Ok(config)
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

    /// Merge CLI arguments (CLI overrides environment)
    pub fn merge(&mut self, cli: CliConfig) {
        if let Some(http_host) = cli.http_host {
            self.http_host = http_host;
        }
        if let Some(http_port) = cli.http_port {
            self.http_port = http_port;
        }
        if let Some(schema_path) = cli.schema_path {
            self.schema_path = schema_path;
        }
    }
}

/// CLI configuration (parsed from command line arguments). `None` leaves the
/// environment or file value in place.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub http_host: Option<String>,
    pub http_port: Option<u16>,
    pub schema_path: Option<String>,
    pub config_file: Option<String>,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.schema_path, "schema.yaml");
    }

    #[test]
    fn test_invalid_port_range() {
        let config = ServerConfig {
            http_port: 0, // Invalid
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_host() {
        let config = ServerConfig {
            http_host: "".to_string(), // Invalid
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_schema_path_must_be_yaml() {
        let config = ServerConfig {
            schema_path: "schema.json".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_to_defaults() {
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.schema_path, "schema.yaml");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_variables() {
        env::set_var("EDGEPATH_PORT", "9999");
        env::set_var("EDGEPATH_SCHEMA", "blog.yaml");
        let config = ServerConfig::from_env();
        env::remove_var("EDGEPATH_PORT");
        env::remove_var("EDGEPATH_SCHEMA");

        let config = config.unwrap();
        assert_eq!(config.http_port, 9999);
        assert_eq!(config.schema_path, "blog.yaml");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unparsable_port() {
        env::set_var("EDGEPATH_PORT", "eighty");
        let result = ServerConfig::from_env();
        env::remove_var("EDGEPATH_PORT");

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "http_host: 127.0.0.1").unwrap();
        writeln!(file, "http_port: 9090").unwrap();
        writeln!(file, "schema_path: blog.yml").unwrap();

        let config = ServerConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.schema_path, "blog.yml");
    }

    #[test]
    fn test_cli_overrides_only_passed_values() {
        let mut config = ServerConfig {
            http_host: "127.0.0.1".to_string(),
            http_port: 9090,
            schema_path: "blog.yml".to_string(),
        };
        config.merge(CliConfig {
            http_port: Some(3000),
            ..Default::default()
        });
        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.schema_path, "blog.yml");
    }

    #[test]
    #[serial]
    fn test_from_cli_layers_arguments_over_environment() {
        env::set_var("EDGEPATH_SCHEMA", "blog.yaml");
        env::set_var("EDGEPATH_PORT", "9999");
        let config = ServerConfig::from_cli(CliConfig {
            http_port: Some(3000),
            ..Default::default()
        });
        env::remove_var("EDGEPATH_SCHEMA");
        env::remove_var("EDGEPATH_PORT");

        let config = config.unwrap();
        assert_eq!(config.schema_path, "blog.yaml");
        assert_eq!(config.http_port, 3000);
    }

    #[test]
    fn test_from_cli_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "http_host: 127.0.0.1").unwrap();
        writeln!(file, "http_port: 9090").unwrap();
        writeln!(file, "schema_path: blog.yml").unwrap();

        let config = ServerConfig::from_cli(CliConfig {
            schema_path: Some("other.yaml".to_string()),
            config_file: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.schema_path, "other.yaml");
    }

    #[test]
    fn test_cli_override_is_validated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "http_host: 127.0.0.1").unwrap();
        writeln!(file, "http_port: 9090").unwrap();
        writeln!(file, "schema_path: blog.yml").unwrap();

        let result = ServerConfig::from_cli(CliConfig {
            schema_path: Some("schema.json".to_string()),
            config_file: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
