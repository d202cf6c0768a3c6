//! Provider traits for the two hosted capabilities the pipeline depends on.
//!
//! [`OpenAIClient`](crate::openai::OpenAIClient) implements both against the
//! hosted API. Tests substitute in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CompletionRequest, SearchRequest, SearchResult};

/// Semantic search over a hosted document collection.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return up to `request.max_rerank` passages, most relevant first.
    ///
    /// Implementations must preserve the provider's ranking; callers rely on
    /// the order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>>;
}

/// Hosted text completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the generated choices in provider order.
    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<String>>;
}
