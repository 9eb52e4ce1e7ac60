pub mod llm_client;
pub mod search_client;

pub use llm_client::{ChatModel, LlmClient};
pub use search_client::{SearchClient, SearchHit, SearchProvider};
