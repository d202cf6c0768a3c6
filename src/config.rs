//! TOML configuration.
//!
//! ```toml
//! [openai]
//! api_base = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [answer]
//! search_collection_id = "file-LfKVMSLJCVjmWHzrCG1eVREZ"
//! completion_model_id = "curie:ft-personal-2022-07-04-15-50-49"
//! max_context_len = 1800
//! ```
//!
//! Only the two identifiers under `[answer]` are required; everything else
//! has a default. See `config/answers.example.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::context::ContextOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAIConfig,
    pub answer: AnswerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAIConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout. Unset means the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnswerConfig {
    /// Hosted collection (uploaded search file) passages are retrieved from.
    pub search_collection_id: String,
    /// Completion model; fine-tuned ids (`base:ft-...`) and base engines both work.
    pub completion_model_id: String,
    /// Token budget for the assembled context.
    #[serde(default = "default_max_context_len")]
    pub max_context_len: usize,
    #[serde(default = "default_search_model")]
    pub search_model: String,
    #[serde(default = "default_max_rerank")]
    pub max_rerank: usize,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_stop_sequences")]
    pub stop_sequences: Vec<String>,
    /// Log the assembled context before each completion.
    #[serde(default)]
    pub debug: bool,
}

fn default_max_context_len() -> usize {
    1800
}
fn default_search_model() -> String {
    "ada".to_string()
}
fn default_max_rerank() -> usize {
    10
}
fn default_max_output_tokens() -> u32 {
    100
}
fn default_stop_sequences() -> Vec<String> {
    vec!["\n".to_string(), ".".to_string()]
}

impl AnswerConfig {
    /// Config for the given collection and model with every other option at
    /// its default.
    pub fn new(search_collection_id: impl Into<String>, completion_model_id: impl Into<String>) -> Self {
        Self {
            search_collection_id: search_collection_id.into(),
            completion_model_id: completion_model_id.into(),
            max_context_len: default_max_context_len(),
            search_model: default_search_model(),
            max_rerank: default_max_rerank(),
            max_output_tokens: default_max_output_tokens(),
            stop_sequences: default_stop_sequences(),
            debug: false,
        }
    }

    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            collection_id: self.search_collection_id.clone(),
            max_len: self.max_context_len,
            search_model: self.search_model.clone(),
            max_rerank: self.max_rerank,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.openai.api_base.trim().is_empty() {
        anyhow::bail!("openai.api_base must not be empty");
    }
    if config.openai.api_key_env.trim().is_empty() {
        anyhow::bail!("openai.api_key_env must not be empty");
    }

    let answer = &config.answer;
    if answer.search_collection_id.trim().is_empty() {
        anyhow::bail!("answer.search_collection_id must not be empty");
    }
    if answer.completion_model_id.trim().is_empty() {
        anyhow::bail!("answer.completion_model_id must not be empty");
    }
    if answer.search_model.trim().is_empty() {
        anyhow::bail!("answer.search_model must not be empty");
    }
    if answer.max_rerank < 1 {
        anyhow::bail!("answer.max_rerank must be >= 1");
    }
    if answer.max_output_tokens < 1 {
        anyhow::bail!("answer.max_output_tokens must be >= 1");
    }

    Ok(())
}
