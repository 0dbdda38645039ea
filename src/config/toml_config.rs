use crate::config::{ClientConfig, DEFAULT_ASK_TIMEOUT_MS, DEFAULT_TIMEOUT_MS, MAX_TIMEOUT_MS};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub timeouts: Option<TimeoutConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub default_ms: Option<u64>,
    pub ask_ms: Option<u64>,
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse the configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` with the environment value. Unset variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeouts
            .as_ref()
            .and_then(|t| t.default_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    pub fn ask_timeout_ms(&self) -> u64 {
        self.timeouts
            .as_ref()
            .and_then(|t| t.ask_ms)
            .unwrap_or(DEFAULT_ASK_TIMEOUT_MS)
    }

    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server.base_url.clone(),
            timeout_ms: self.timeout_ms(),
            ask_timeout_ms: self.ask_timeout_ms(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.base_url", &self.server.base_url)?;
        validate_url("server.base_url", &self.server.base_url)?;
        validate_range("timeouts.default_ms", self.timeout_ms(), 1, MAX_TIMEOUT_MS)?;
        validate_range("timeouts.ask_ms", self.ask_timeout_ms(), 1, MAX_TIMEOUT_MS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[server]
base_url = "http://contracts.internal:8000"

[timeouts]
default_ms = 5000
ask_ms = 60000
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());

        let client_config = config.to_client_config();
        assert_eq!(client_config.base_url, "http://contracts.internal:8000");
        assert_eq!(client_config.timeout_ms, 5000);
        assert_eq!(client_config.ask_timeout_ms, 60000);
    }

    #[test]
    fn test_timeouts_default_when_missing() {
        let config = TomlConfig::from_toml_str(
            r#"
[server]
base_url = "http://127.0.0.1:8000"
"#,
        )
        .unwrap();

        let client_config = config.to_client_config();
        assert_eq!(client_config, ClientConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONTRATOS_TEST_BASE_URL", "https://contratos.example.com");

        let toml_content = r#"
[server]
base_url = "${CONTRATOS_TEST_BASE_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.base_url, "https://contratos.example.com");

        std::env::remove_var("CONTRATOS_TEST_BASE_URL");
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let config = TomlConfig::from_toml_str(
            r#"
[server]
base_url = "${CONTRATOS_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "${CONTRATOS_TEST_DEFINITELY_UNSET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[server]
base_url = "ftp://contracts.internal"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = TomlConfig::from_toml_str("[timeouts]\ndefault_ms = 1").unwrap_err();
        assert!(matches!(err, ClientError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
base_url = "http://localhost:9000"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:9000");
    }
}
