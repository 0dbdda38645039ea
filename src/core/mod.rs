pub mod client;
pub mod transport;

pub use crate::domain::model::{AnswerResult, Contract, SearchResult, Source};
pub use crate::domain::ports::{ConfigProvider, ContractApi};
pub use crate::utils::error::Result;
