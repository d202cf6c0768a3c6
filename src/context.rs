//! Length-budgeted context assembly.
//!
//! Passages come back from the search provider ranked by relevance. They are
//! accepted greedily, in that order, until the running token cost would pass
//! the budget. Accumulation stops at the first passage that overflows: a
//! later, shorter passage is never substituted in, and nothing is re-sorted.
//!
//! ```rust
//! use answer_harness::context::assemble_context;
//! use answer_harness::models::SearchResult;
//!
//! let results = vec![
//!     SearchResult::new("first", "10"),
//!     SearchResult::new("second", "10"),
//!     SearchResult::new("third", "1"),
//! ];
//! // 14 + 14 = 28 > 20, so "second" stops accumulation and "third" is never considered
//! assert_eq!(assemble_context(&results, 20).unwrap(), "first");
//! ```

use crate::error::AnswerError;
use crate::models::{SearchRequest, SearchResult};
use crate::provider::SearchProvider;

/// Separator placed between accepted passages.
pub const CONTEXT_DELIMITER: &str = "\n\n###\n\n";

/// Fixed per-passage token overhead added to each passage's reported length.
///
/// Tied to the hosted search tokenizer's accounting for the separator, not a
/// general rule.
pub const PASSAGE_OVERHEAD_TOKENS: i64 = 4;

/// Budgets for a single context lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Collection (uploaded file) to search.
    pub collection_id: String,
    /// Maximum context length in tokens.
    pub max_len: usize,
    /// Search engine used for ranking (e.g. `"ada"`).
    pub search_model: String,
    /// Maximum number of candidate passages the provider should return.
    pub max_rerank: usize,
}

/// Search for `question` and assemble the passages into one context string.
pub async fn create_context(
    search: &dyn SearchProvider,
    question: &str,
    options: &ContextOptions,
) -> Result<String, AnswerError> {
    let request = SearchRequest {
        query: question.to_string(),
        file: options.collection_id.clone(),
        search_model: options.search_model.clone(),
        max_rerank: options.max_rerank,
        return_metadata: true,
    };

    let results = search
        .search(&request)
        .await
        .map_err(AnswerError::retrieval)?;

    tracing::debug!(
        candidates = results.len(),
        max_len = options.max_len,
        "search returned candidates"
    );

    assemble_context(&results, options.max_len)
}

/// Greedily join passages, in order, while their total cost stays within
/// `max_len`.
///
/// Each passage costs its parsed `metadata` plus [`PASSAGE_OVERHEAD_TOKENS`].
/// Returns an empty string when there are no results or the first one alone
/// overflows.
///
/// # Errors
///
/// [`AnswerError::MalformedMetadata`] if a passage reached before the cut-off
/// has a non-integer `metadata`.
pub fn assemble_context(results: &[SearchResult], max_len: usize) -> Result<String, AnswerError> {
    let budget = i64::try_from(max_len).unwrap_or(i64::MAX);
    let mut accepted: Vec<&str> = Vec::new();
    let mut cur_len: i64 = 0;

    for (index, result) in results.iter().enumerate() {
        let len = result
            .token_len()
            .ok_or_else(|| AnswerError::MalformedMetadata {
                index,
                value: result.metadata.clone(),
            })?;

        cur_len = cur_len.saturating_add(len.saturating_add(PASSAGE_OVERHEAD_TOKENS));
        if cur_len > budget {
            break;
        }
        accepted.push(&result.text);
    }

    Ok(accepted.join(CONTEXT_DELIMITER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn passages(items: &[(&str, &str)]) -> Vec<SearchResult> {
        items
            .iter()
            .map(|(text, meta)| SearchResult::new(*text, *meta))
            .collect()
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(assemble_context(&[], 1800).unwrap(), "");
    }

    #[test]
    fn test_delimiter_is_exact() {
        let results = passages(&[("a", "1"), ("b", "1")]);
        assert_eq!(assemble_context(&results, 1800).unwrap(), "a\n\n###\n\nb");
    }

    #[test]
    fn test_order_is_preserved() {
        let results = passages(&[("third", "1"), ("first", "1"), ("second", "1")]);
        assert_eq!(
            assemble_context(&results, 1800).unwrap(),
            ["third", "first", "second"].join(CONTEXT_DELIMITER)
        );
    }

    #[test]
    fn test_budget_boundary_is_inclusive() {
        // (6 + 4) + (6 + 4) = 20
        let results = passages(&[("a", "6"), ("b", "6")]);
        assert_eq!(assemble_context(&results, 20).unwrap(), "a\n\n###\n\nb");
        assert_eq!(assemble_context(&results, 19).unwrap(), "a");
    }

    #[test]
    fn test_first_overflow_stops_accumulation() {
        let results = passages(&[("a", "10"), ("big", "100"), ("tiny", "0")]);
        // "tiny" would fit on its own, but accumulation already stopped
        assert_eq!(assemble_context(&results, 30).unwrap(), "a");
    }

    #[test]
    fn test_first_passage_overflows() {
        let results = passages(&[("huge", "5000"), ("small", "1")]);
        assert_eq!(assemble_context(&results, 1800).unwrap(), "");
    }

    #[test]
    fn test_out_of_range_length_stops_accumulation() {
        let results = passages(&[("a", "1"), ("b", "99999999999999999999999"), ("c", "1")]);
        assert_eq!(assemble_context(&results, usize::MAX).unwrap(), "a");
    }

    #[test]
    fn test_overhead_counts_against_budget() {
        // Reported length fits, overhead pushes it over
        let results = passages(&[("a", "8")]);
        assert_eq!(assemble_context(&results, 11).unwrap(), "");
        assert_eq!(assemble_context(&results, 12).unwrap(), "a");
    }

    #[test]
    fn test_accepted_prefix_respects_budget() {
        let lens = [120, 40, 300, 5, 77, 600, 2, 90];
        let results: Vec<SearchResult> = lens
            .iter()
            .enumerate()
            .map(|(i, n)| SearchResult::new(format!("p{}", i), n.to_string()))
            .collect();

        for max_len in [0usize, 10, 124, 200, 500, 1000, 1800] {
            let context = assemble_context(&results, max_len).unwrap();
            let accepted = if context.is_empty() {
                0
            } else {
                context.split(CONTEXT_DELIMITER).count()
            };

            let cost: i64 = lens[..accepted].iter().map(|n| n + 4).sum();
            assert!(cost <= max_len as i64);
            if accepted < lens.len() {
                assert!(cost + lens[accepted] + 4 > max_len as i64);
            }
        }
    }

    #[test]
    fn test_malformed_metadata_is_an_error() {
        let results = passages(&[("a", "3"), ("b", "three")]);
        match assemble_context(&results, 1800) {
            Err(AnswerError::MalformedMetadata { index, value }) => {
                assert_eq!(index, 1);
                assert_eq!(value, "three");
            }
            other => panic!("expected MalformedMetadata, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_metadata_after_cutoff_is_ignored() {
        let results = passages(&[("a", "100"), ("b", "100"), ("c", "oops")]);
        assert_eq!(assemble_context(&results, 150).unwrap(), "a");
    }

    struct RecordingSearch {
        results: Vec<SearchResult>,
        seen: Mutex<Vec<SearchRequest>>,
    }

    #[async_trait]
    impl SearchProvider for RecordingSearch {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.results.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl SearchProvider for FailingSearch {
        async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchResult>> {
            anyhow::bail!("connection reset")
        }
    }

    fn options() -> ContextOptions {
        ContextOptions {
            collection_id: "file-abc".to_string(),
            max_len: 1800,
            search_model: "ada".to_string(),
            max_rerank: 10,
        }
    }

    #[tokio::test]
    async fn test_create_context_builds_search_request() {
        let search = RecordingSearch {
            results: passages(&[("Jane Doe is the partner.", "6")]),
            seen: Mutex::new(Vec::new()),
        };

        let context = create_context(&search, "Who is the partner?", &options())
            .await
            .unwrap();
        assert_eq!(context, "Jane Doe is the partner.");

        let seen = search.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query, "Who is the partner?");
        assert_eq!(seen[0].file, "file-abc");
        assert_eq!(seen[0].search_model, "ada");
        assert_eq!(seen[0].max_rerank, 10);
        assert!(seen[0].return_metadata);
    }

    #[tokio::test]
    async fn test_create_context_maps_search_errors() {
        let err = create_context(&FailingSearch, "q", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerError::RetrievalFailed(ref msg) if msg.contains("connection reset")));
    }
}
