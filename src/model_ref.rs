//! Completion model references.
//!
//! The completions API addresses fine-tuned models and shared base engines
//! differently: a fine-tuned model is named in the request body, a base
//! engine in the URL. Fine-tuned identifiers are recognizable by their
//! shape, `<base>:ft-<owner>-<timestamp>`, e.g.
//! `curie:ft-personal-2022-07-04-15-50-49`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    /// A customer fine-tuned model, sent as the `model` field.
    FineTuned(String),
    /// A shared base engine, addressed as `/engines/{id}`.
    BaseEngine(String),
}

impl ModelRef {
    /// Classify a completion model identifier.
    ///
    /// An identifier is fine-tuned when it contains `:` and the segment
    /// after the first `:` starts with `ft`. Everything else is a base
    /// engine.
    pub fn classify(id: &str) -> Self {
        let fine_tuned = id
            .split(':')
            .nth(1)
            .is_some_and(|segment| segment.starts_with("ft"));

        if fine_tuned {
            ModelRef::FineTuned(id.to_string())
        } else {
            ModelRef::BaseEngine(id.to_string())
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ModelRef::FineTuned(id) | ModelRef::BaseEngine(id) => id,
        }
    }

    pub fn is_fine_tuned(&self) -> bool {
        matches!(self, ModelRef::FineTuned(_))
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRef::FineTuned(id) => write!(f, "model {}", id),
            ModelRef::BaseEngine(id) => write!(f, "engine {}", id),
        }
    }
}
