//! OpenAI HTTP client for search and completions.
//!
//! Implements [`SearchProvider`] and [`CompletionProvider`] against the
//! OpenAI v1 REST API:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | Search | `POST {api_base}/engines/{search_model}/search` |
//! | Completion, fine-tuned model | `POST {api_base}/completions` (`model` in body) |
//! | Completion, base engine | `POST {api_base}/engines/{engine}/completions` |
//!
//! Authentication uses a bearer token read from the environment variable
//! named by `openai.api_key_env` (default `OPENAI_API_KEY`).
//!
//! Every call is made exactly once. A non-2xx status or an unexpected
//! response shape is returned as an error; nothing is retried.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::OpenAIConfig;
use crate::model_ref::ModelRef;
use crate::models::{CompletionRequest, SearchRequest, SearchResult};
use crate::provider::{CompletionProvider, SearchProvider};

pub struct OpenAIClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenAIClient {
    /// Create a client with an explicit API key.
    pub fn new(config: &OpenAIConfig, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client, reading the API key from `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(config: &OpenAIConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", config.api_key_env))?;
        Self::new(config, api_key)
    }

    fn search_url(&self, search_model: &str) -> String {
        format!("{}/engines/{}/search", self.api_base, search_model)
    }

    fn completion_url(&self, target: &ModelRef) -> String {
        match target {
            ModelRef::FineTuned(_) => format!("{}/completions", self.api_base),
            ModelRef::BaseEngine(engine) => {
                format!("{}/engines/{}/completions", self.api_base, engine)
            }
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("invalid JSON from {}", url))
    }
}

#[async_trait]
impl SearchProvider for OpenAIClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = self.search_url(&request.search_model);
        tracing::debug!(%url, max_rerank = request.max_rerank, "searching collection");
        let json = self.post_json(&url, &search_body(request)).await?;
        parse_search_response(&json)
    }
}

#[async_trait]
impl CompletionProvider for OpenAIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Vec<String>> {
        let url = self.completion_url(&request.target);
        tracing::debug!(%url, target = %request.target, "requesting completion");
        let json = self.post_json(&url, &completion_body(request)).await?;
        parse_completion_response(&json)
    }
}

pub fn search_body(request: &SearchRequest) -> Value {
    json!({
        "query": request.query,
        "file": request.file,
        "max_rerank": request.max_rerank,
        "return_metadata": request.return_metadata,
    })
}

/// Build the completion body.
///
/// Fine-tuned models are named by a `model` field; base engines are
/// addressed by URL and carry no model field.
pub fn completion_body(request: &CompletionRequest) -> Value {
    let mut body = json!({
        "prompt": request.prompt,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
        "top_p": request.top_p,
        "frequency_penalty": request.frequency_penalty,
        "presence_penalty": request.presence_penalty,
        "stop": request.stop,
    });

    if let ModelRef::FineTuned(model) = &request.target {
        if let Some(obj) = body.as_object_mut() {
            obj.insert("model".to_string(), json!(model));
        }
    }

    body
}

/// Extract `data[].{text, metadata}` in response order.
///
/// `metadata` may arrive as a string or a number; both become the string
/// form. Fractional numbers are truncated toward zero and out-of-range ones
/// saturate. A missing `metadata` becomes an empty string, which the context
/// builder later rejects.
pub fn parse_search_response(json: &Value) -> Result<Vec<SearchResult>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid search response: missing data array"))?;

    let mut results = Vec::with_capacity(data.len());
    for item in data {
        let text = item
            .get("text")
            .and_then(|t| t.as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid search response: missing text"))?;

        let metadata = match item.get("metadata") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => number_metadata(n),
            _ => String::new(),
        };

        results.push(SearchResult::new(text, metadata));
    }

    Ok(results)
}

fn number_metadata(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if n.is_u64() {
        i64::MAX.to_string()
    } else {
        // `as` saturates out-of-range floats
        n.as_f64().map(|f| (f.trunc() as i64).to_string()).unwrap_or_default()
    }
}

/// Extract `choices[].text` in response order.
pub fn parse_completion_response(json: &Value) -> Result<Vec<String>> {
    let choices = json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid completion response: missing choices array"))?;

    choices
        .iter()
        .map(|choice| {
            choice
                .get("text")
                .and_then(|t| t.as_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("Invalid completion response: missing text"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str) -> OpenAIClient {
        let config = OpenAIConfig {
            api_base: api_base.to_string(),
            ..OpenAIConfig::default()
        };
        OpenAIClient::new(&config, "sk-test").unwrap()
    }

    fn completion(target: ModelRef) -> CompletionRequest {
        CompletionRequest::deterministic(
            target,
            "prompt".to_string(),
            100,
            vec!["\n".to_string(), ".".to_string()],
        )
    }

    #[test]
    fn test_urls() {
        let c = client("https://api.openai.com/v1/");
        assert_eq!(c.search_url("ada"), "https://api.openai.com/v1/engines/ada/search");
        assert_eq!(
            c.completion_url(&ModelRef::classify("text-davinci-002")),
            "https://api.openai.com/v1/engines/text-davinci-002/completions"
        );
        assert_eq!(
            c.completion_url(&ModelRef::classify("curie:ft-personal-2022")),
            "https://api.openai.com/v1/completions"
        );
    }

    #[test]
    fn test_search_body() {
        let body = search_body(&SearchRequest {
            query: "Who?".to_string(),
            file: "file-abc".to_string(),
            search_model: "ada".to_string(),
            max_rerank: 10,
            return_metadata: true,
        });
        assert_eq!(
            body,
            json!({
                "query": "Who?",
                "file": "file-abc",
                "max_rerank": 10,
                "return_metadata": true,
            })
        );
    }

    #[test]
    fn test_completion_body_for_fine_tuned_model() {
        let body = completion_body(&completion(ModelRef::classify("curie:ft-x")));
        assert_eq!(body["model"], "curie:ft-x");
        assert_eq!(body["prompt"], "prompt");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["top_p"], 1.0);
        assert_eq!(body["frequency_penalty"], 0.0);
        assert_eq!(body["presence_penalty"], 0.0);
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["stop"], json!(["\n", "."]));
    }

    #[test]
    fn test_completion_body_for_base_engine_has_no_model() {
        let body = completion_body(&completion(ModelRef::classify("text-davinci-002")));
        assert!(body.get("model").is_none());
        assert!(body.get("engine").is_none());
    }

    #[test]
    fn test_parse_search_response() {
        let json = json!({
            "object": "list",
            "data": [
                {"document": 3, "score": 210.4, "text": "Jane Doe is the partner.", "metadata": "6"},
                {"document": 0, "score": 90.1, "text": "Other passage", "metadata": 12},
                {"document": 1, "score": 10.0, "text": "No metadata"},
            ]
        });
        let results = parse_search_response(&json).unwrap();
        assert_eq!(
            results,
            vec![
                SearchResult::new("Jane Doe is the partner.", "6"),
                SearchResult::new("Other passage", "12"),
                SearchResult::new("No metadata", ""),
            ]
        );
    }

    #[test]
    fn test_parse_search_response_numeric_metadata() {
        let json = json!({
            "data": [
                {"text": "whole float", "metadata": 6.0},
                {"text": "fraction", "metadata": 6.7},
                {"text": "negative fraction", "metadata": -2.5},
                {"text": "past i64", "metadata": 18446744073709551615u64},
                {"text": "huge float", "metadata": 1e300},
            ]
        });
        let lens: Vec<Option<i64>> = parse_search_response(&json)
            .unwrap()
            .iter()
            .map(|r| r.token_len())
            .collect();
        assert_eq!(
            lens,
            vec![Some(6), Some(6), Some(-2), Some(i64::MAX), Some(i64::MAX)]
        );
    }

    #[test]
    fn test_parse_search_response_errors() {
        assert!(parse_search_response(&json!({"error": "nope"})).is_err());
        assert!(parse_search_response(&json!({"data": [{"metadata": "1"}]})).is_err());
        assert!(parse_search_response(&json!({"data": []})).unwrap().is_empty());
    }

    #[test]
    fn test_parse_completion_response() {
        let json = json!({
            "choices": [
                {"text": " Jane Doe", "index": 0, "finish_reason": "stop"},
                {"text": "other", "index": 1, "finish_reason": "stop"},
            ]
        });
        assert_eq!(
            parse_completion_response(&json).unwrap(),
            vec![" Jane Doe".to_string(), "other".to_string()]
        );
        assert!(parse_completion_response(&json!({})).is_err());
        assert!(parse_completion_response(&json!({"choices": [{}]})).is_err());
    }

    #[test]
    fn test_from_env_requires_key() {
        let config = OpenAIConfig {
            api_key_env: "ANSWER_HARNESS_TEST_UNSET_KEY".to_string(),
            ..OpenAIConfig::default()
        };
        let err = OpenAIClient::from_env(&config).err().unwrap();
        assert!(err.to_string().contains("ANSWER_HARNESS_TEST_UNSET_KEY"));
    }
}
