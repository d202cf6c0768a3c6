//! Question answering over retrieved context.
//!
//! [`AnswerGenerator`] runs one question through two provider calls, in
//! order:
//!
//! 1. search the configured collection and assemble a length-budgeted
//!    context ([`crate::context`]);
//! 2. complete a fixed prompt built from that context and the question,
//!    with deterministic decoding.
//!
//! The first completion choice is trimmed and given a trailing period.
//!
//! # Failures
//!
//! [`AnswerGenerator::answer`] returns an [`AnswerError`] naming the stage
//! that failed. [`AnswerGenerator::answer_or_empty`] logs the error and
//! returns an empty string instead, which is what the interactive CLI
//! prints.

use std::sync::Arc;

use crate::config::AnswerConfig;
use crate::context::create_context;
use crate::error::AnswerError;
use crate::model_ref::ModelRef;
use crate::models::CompletionRequest;
use crate::provider::{CompletionProvider, SearchProvider};

pub struct AnswerGenerator {
    config: AnswerConfig,
    model: ModelRef,
    search: Arc<dyn SearchProvider>,
    completion: Arc<dyn CompletionProvider>,
}

impl AnswerGenerator {
    pub fn new(
        config: AnswerConfig,
        search: Arc<dyn SearchProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        let model = ModelRef::classify(&config.completion_model_id);
        tracing::debug!(%model, "completion target resolved");
        Self {
            config,
            model,
            search,
            completion,
        }
    }

    pub fn config(&self) -> &AnswerConfig {
        &self.config
    }

    /// How completions are addressed for the configured model.
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// Retrieve and assemble the context for `question` without completing.
    pub async fn context(&self, question: &str) -> Result<String, AnswerError> {
        create_context(
            self.search.as_ref(),
            question,
            &self.config.context_options(),
        )
        .await
    }

    /// Answer `question` from the configured collection.
    pub async fn answer(&self, question: &str) -> Result<String, AnswerError> {
        let context = self.context(question).await?;

        if self.config.debug {
            tracing::info!("Context:\n{}\n", context);
        }

        let request = CompletionRequest::deterministic(
            self.model.clone(),
            build_prompt(&context, question),
            self.config.max_output_tokens,
            self.config.stop_sequences.clone(),
        );

        let choices = self
            .completion
            .complete(&request)
            .await
            .map_err(AnswerError::completion)?;

        let first = choices
            .into_iter()
            .next()
            .ok_or_else(|| AnswerError::CompletionFailed("response contained no choices".to_string()))?;

        Ok(finalize_answer(&first))
    }

    /// Like [`answer`](Self::answer), but logs any failure and returns `""`.
    pub async fn answer_or_empty(&self, question: &str) -> String {
        match self.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "failed to answer question");
                String::new()
            }
        }
    }
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based on the context below\n\nText: {}\n\n---\n\nQuestion: {}\nAnswer:",
        context, question
    )
}

/// Trim the completion and make sure it ends with a period.
pub fn finalize_answer(raw: &str) -> String {
    let mut answer = raw.trim().to_string();
    if !answer.ends_with('.') {
        answer.push('.');
    }
    answer
}
