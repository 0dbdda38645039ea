use crate::config::toml_config::TomlConfig;
use crate::config::ClientConfig;
use crate::core::client::{
    DEFAULT_LIST_LIMIT, DEFAULT_LIST_SKIP, DEFAULT_MAX_RESULTS, DEFAULT_SEARCH_LIMIT,
};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "contratos")]
#[command(about = "Query the contracts backend: list, search, files and questions")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Backend base URL (overrides the config file)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Default request timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Timeout for questions in milliseconds")]
    pub ask_timeout_ms: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List contracts page by page
    List {
        #[arg(long, default_value_t = DEFAULT_LIST_SKIP)]
        skip: u32,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,
    },
    /// Semantic search over contracts
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// List the distinct contract files
    Files,
    /// Ask a question answered from the contracts
    Ask {
        question: String,
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
    },
}

impl CliConfig {
    /// Flags win over the config file, which wins over the built-in defaults.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file.to_client_config()
            }
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(ask_timeout_ms) = self.ask_timeout_ms {
            config.ask_timeout_ms = ask_timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_subcommands_with_defaults() {
        let cli = CliConfig::parse_from(["contratos", "list"]);
        assert!(matches!(cli.command, Command::List { skip: 0, limit: 10 }));

        let cli = CliConfig::parse_from(["contratos", "search", "multa rescisória"]);
        match cli.command {
            Command::Search { query, limit } => {
                assert_eq!(query, "multa rescisória");
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = CliConfig::parse_from(["contratos", "ask", "Qual o prazo?"]);
        assert!(matches!(cli.command, Command::Ask { max_results: 3, .. }));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nbase_url = \"http://from-file:8000\"\n\n[timeouts]\nask_ms = 45000\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "contratos",
            "--config",
            path.as_str(),
            "--timeout-ms",
            "2000",
            "files",
        ]);
        let config = cli.client_config().unwrap();
        assert_eq!(config.base_url, "http://from-file:8000");
        assert_eq!(config.timeout_ms, 2000);
        assert_eq!(config.ask_timeout_ms, 45000);

        let cli = CliConfig::parse_from([
            "contratos",
            "--config",
            path.as_str(),
            "--base-url",
            "http://override:9000",
            "files",
        ]);
        assert_eq!(cli.client_config().unwrap().base_url, "http://override:9000");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = CliConfig::parse_from(["contratos", "--base-url", "not-a-url", "files"]);
        assert!(cli.client_config().is_err());
    }
}
