pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use crate::core::{
    client::RemoteContractClient, transport::Transport, AnswerResult, ConfigProvider, Contract,
    ContractApi, SearchResult, Source,
};
pub use config::{toml_config::TomlConfig, ClientConfig};
pub use utils::error::{ClientError, Result, TransportError};
