use crate::domain::model::{AnswerResult, SearchResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn default_timeout(&self) -> Duration;
    fn ask_timeout(&self) -> Duration;
}

/// Remote operations offered by the contracts backend.
#[async_trait]
pub trait ContractApi: Send + Sync {
    async fn list_contracts(&self, skip: u32, limit: u32) -> Result<SearchResult>;
    async fn search_contracts(&self, query: &str, limit: u32) -> Result<SearchResult>;
    async fn list_files(&self) -> Result<Vec<String>>;
    async fn ask_question(&self, question: &str, max_results: u32) -> Result<AnswerResult>;
}
