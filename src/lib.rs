//! # Answer Harness
//!
//! Retrieval-augmented question answering over a hosted search index and
//! hosted completion models.
//!
//! For each question, the passages most relevant to it are fetched from a
//! hosted collection, packed into a context string under a token budget, and
//! sent with the question to a completion model using a fixed prompt. Both
//! retrieval and generation happen on the provider's side; nothing is
//! indexed, ranked or stored locally.
//!
//! ## Architecture
//!
//! ```text
//!  question
//!     │
//!     ▼
//! ┌──────────────┐  search   ┌──────────────────┐
//! │   context    │──────────▶│  SearchProvider  │
//! │ (budgeted)   │◀──────────│  (hosted index)  │
//! └──────┬───────┘ passages  └──────────────────┘
//!        │ context
//!        ▼
//! ┌──────────────┐ complete  ┌──────────────────────┐
//! │    answer    │──────────▶│  CompletionProvider  │
//! │  (prompt)    │◀──────────│  (model or engine)   │
//! └──────┬───────┘  choices  └──────────────────────┘
//!        ▼
//!     "Answer."
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! ask --config ./config/answers.toml chat
//! ask answer "Who is the partner in Deloitte legal?"
//! ask --debug context "Who is the partner in Deloitte legal?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Search and completion request/response types |
//! | [`model_ref`] | Fine-tuned model vs. base engine classification |
//! | [`provider`] | Search and completion provider traits |
//! | [`openai`] | OpenAI HTTP implementation of the providers |
//! | [`context`] | Length-budgeted context assembly |
//! | [`answer`] | Prompting and answer post-processing |
//! | [`error`] | Answer pipeline error kinds |
//! | [`repl`] | Interactive question loop |
//! | [`logging`] | `tracing` subscriber setup |

pub mod answer;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model_ref;
pub mod models;
pub mod openai;
pub mod provider;
pub mod repl;
