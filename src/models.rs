//! Request and response types exchanged with the search and completion
//! providers.
//!
//! Everything here is request scoped: built for one question and dropped
//! once the answer has been produced.

use crate::model_ref::ModelRef;

/// One ranked passage returned by the search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub text: String,
    /// Token length of `text`, as sent by the provider (integer-like string).
    pub metadata: String,
}

impl SearchResult {
    pub fn new(text: impl Into<String>, metadata: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: metadata.into(),
        }
    }

    /// Parse `metadata` as a token count.
    ///
    /// Surrounding whitespace and a leading sign are accepted. Integers past
    /// the `i64` range saturate, so an absurd length still overflows the
    /// budget instead of failing. Fractions, empty strings and words return
    /// `None`.
    pub fn token_len(&self) -> Option<i64> {
        let trimmed = self.metadata.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(n);
        }

        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(if negative { i64::MIN } else { i64::MAX })
    }
}

/// A semantic search over a hosted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Collection (uploaded file) identifier.
    pub file: String,
    /// Engine that ranks the passages (e.g. `"ada"`).
    pub search_model: String,
    pub max_rerank: usize,
    pub return_metadata: bool,
}

/// A single text completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub target: ModelRef,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: Vec<String>,
}

impl CompletionRequest {
    /// Greedy decoding: temperature 0, top_p 1 and no penalties, so the same
    /// prompt always yields the same completion.
    pub fn deterministic(
        target: ModelRef,
        prompt: String,
        max_tokens: u32,
        stop: Vec<String>,
    ) -> Self {
        Self {
            target,
            prompt,
            temperature: 0.0,
            max_tokens,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop,
        }
    }
}
