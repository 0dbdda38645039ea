use crate::core::transport::Transport;
use crate::core::{AnswerResult, ConfigProvider, ContractApi, SearchResult};
use crate::domain::model::{AskRequest, FileListing};
use crate::utils::error::{
    ClientError, Result, TransportError, EMPTY_QUESTION_MESSAGE, NETWORK_ERROR_MESSAGE,
    REQUEST_SETUP_PREFIX, SERVER_ERROR_FALLBACK,
};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_LIST_SKIP: u32 = 0;
pub const DEFAULT_LIST_LIMIT: u32 = 10;
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const DEFAULT_MAX_RESULTS: u32 = 3;
/// Longest question sent to the backend, in characters.
pub const MAX_QUESTION_CHARS: usize = 1000;

const CONTRACTS_PATH: &str = "/contratos";
const SEARCH_PATH: &str = "/contratos/busca";
const FILES_PATH: &str = "/contratos/arquivos";
const ASK_PATH: &str = "/mcp/ask";

/// Client for the contracts backend.
///
/// Listing, search and file listing hand transport failures back untouched as
/// [`ClientError::Transport`]. Only [`RemoteContractClient::ask_question`] turns
/// them into `ServerError` / `NetworkError` / `RequestSetupError`.
#[derive(Debug, Clone)]
pub struct RemoteContractClient {
    transport: Transport,
    ask_timeout: Duration,
}

impl RemoteContractClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = Transport::new(config)?;
        tracing::info!("API URL configured: {}", transport.base_url());
        Ok(Self {
            transport,
            ask_timeout: config.ask_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    pub async fn list_contracts(&self, skip: u32, limit: u32) -> Result<SearchResult> {
        tracing::info!("📡 Calling API: {}?skip={}&limit={}", CONTRACTS_PATH, skip, limit);

        let query = [("skip", skip.to_string()), ("limit", limit.to_string())];
        match self.transport.get_json::<SearchResult>(CONTRACTS_PATH, &query).await {
            Ok(result) => {
                tracing::debug!("API response: {:?}", result);
                Ok(result)
            }
            Err(e) => {
                tracing::error!("❌ API call failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn search_contracts(&self, query: &str, limit: u32) -> Result<SearchResult> {
        tracing::info!(
            "📡 Calling API: {} with q={:?} limit={}",
            SEARCH_PATH,
            query,
            limit
        );

        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        match self.transport.get_json::<SearchResult>(SEARCH_PATH, &params).await {
            Ok(result) => {
                tracing::debug!("API response: {:?}", result);
                Ok(result)
            }
            Err(e) => {
                tracing::error!("❌ API call failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn list_files(&self) -> Result<Vec<String>> {
        tracing::info!("📡 Calling API: {}", FILES_PATH);

        match self.transport.get_json::<FileListing>(FILES_PATH, &[]).await {
            Ok(listing) => {
                tracing::debug!("API response: {} files", listing.arquivos.len());
                Ok(listing.arquivos)
            }
            Err(e) => {
                tracing::error!("❌ API call failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn ask_question(&self, question: &str, max_results: u32) -> Result<AnswerResult> {
        tracing::info!("📡 Calling MCP API: {} with question: {:?}", ASK_PATH, question);

        let request = AskRequest {
            pergunta: prepare_question(question)
                .inspect_err(|e| tracing::error!("❌ Question rejected: {}", e))?,
            max_results,
        };

        match self
            .transport
            .post_json::<_, AnswerResult>(ASK_PATH, &request, Some(self.ask_timeout))
            .await
        {
            Ok(answer) => {
                tracing::info!("MCP API answered with {} sources", answer.sources.len());
                tracing::debug!("MCP API response: {:?}", answer);
                Ok(answer)
            }
            Err(ClientError::Transport(err)) => Err(normalize_ask_error(err)),
            Err(e) => {
                tracing::error!("❌ MCP API call failed: {}", e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ContractApi for RemoteContractClient {
    async fn list_contracts(&self, skip: u32, limit: u32) -> Result<SearchResult> {
        RemoteContractClient::list_contracts(self, skip, limit).await
    }

    async fn search_contracts(&self, query: &str, limit: u32) -> Result<SearchResult> {
        RemoteContractClient::search_contracts(self, query, limit).await
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        RemoteContractClient::list_files(self).await
    }

    async fn ask_question(&self, question: &str, max_results: u32) -> Result<AnswerResult> {
        RemoteContractClient::ask_question(self, question, max_results).await
    }
}

/// Trim the question, reject it when blank, and cap it at [`MAX_QUESTION_CHARS`].
pub fn prepare_question(question: &str) -> Result<String> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidInput {
            message: EMPTY_QUESTION_MESSAGE.to_string(),
        });
    }
    Ok(trimmed.chars().take(MAX_QUESTION_CHARS).collect())
}

fn normalize_ask_error(err: TransportError) -> ClientError {
    match err {
        TransportError::Response { status, body } => {
            tracing::error!("❌ Error {} from MCP API: {}", status, body);
            ClientError::ServerError {
                status,
                message: error_detail(&body).unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string()),
            }
        }
        TransportError::NoResponse(e) => {
            tracing::error!("❌ Timeout or network error calling MCP API: {}", e);
            ClientError::NetworkError {
                message: NETWORK_ERROR_MESSAGE.to_string(),
            }
        }
        TransportError::Setup { message } => {
            tracing::error!("❌ Failed to prepare MCP API call: {}", message);
            ClientError::RequestSetupError {
                message: format!("{}{}", REQUEST_SETUP_PREFIX, message),
            }
        }
    }
}

/// The `detail` field of an error body. Blank or null counts as absent.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
