//! Error kinds surfaced by the answer pipeline.
//!
//! Configuration loading and the HTTP client use `anyhow`; once an error
//! crosses into [`AnswerGenerator`](crate::answer::AnswerGenerator) it is
//! classified by the stage that failed, so callers can tell a failed call
//! apart from an answer that is simply empty.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerError {
    /// The search call failed (transport, HTTP status or response shape).
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),

    /// The completion call failed or returned no choices.
    #[error("completion failed: {0}")]
    CompletionFailed(String),

    /// A search result carried a `metadata` value that is not an integer.
    #[error("malformed metadata on search result {index}: '{value}'")]
    MalformedMetadata { index: usize, value: String },
}

impl AnswerError {
    pub fn retrieval<E: std::fmt::Display>(err: E) -> Self {
        AnswerError::RetrievalFailed(format!("{:#}", err))
    }

    pub fn completion<E: std::fmt::Display>(err: E) -> Self {
        AnswerError::CompletionFailed(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AnswerError::retrieval("connection refused");
        assert_eq!(err.to_string(), "retrieval failed: connection refused");

        let err = AnswerError::MalformedMetadata {
            index: 2,
            value: "six".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed metadata on search result 2: 'six'"
        );
    }

    #[test]
    fn test_anyhow_chain_is_flattened() {
        let inner = anyhow::anyhow!("status 500").context("search request failed");
        let err = AnswerError::completion(inner);
        assert_eq!(
            err.to_string(),
            "completion failed: search request failed: status 500"
        );
    }
}
