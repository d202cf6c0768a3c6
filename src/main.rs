//! # Answer Harness CLI (`ask`)
//!
//! Answers questions from a hosted document collection.
//!
//! ## Usage
//!
//! ```bash
//! ask --config ./config/answers.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ask chat` | Print sample questions, then answer questions read from stdin |
//! | `ask answer "<question>"` | Answer a single question |
//! | `ask context "<question>"` | Print the retrieved context for a question |
//!
//! The API key is read from the environment variable named by
//! `[openai].api_key_env` (default `OPENAI_API_KEY`).

use answer_harness::answer::AnswerGenerator;
use answer_harness::config;
use answer_harness::logging;
use answer_harness::openai::OpenAIClient;
use answer_harness::repl;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Answer Harness CLI: question answering over a hosted search index.
#[derive(Parser)]
#[command(
    name = "ask",
    about = "Answer Harness: question answering over a hosted search index",
    version,
    long_about = "Answer Harness retrieves the passages most relevant to a question from a hosted \
    collection, packs them into a length-budgeted context, and asks a hosted completion model \
    to answer from that context."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/answers.toml`. See `config/answers.example.toml`.
    #[arg(long, global = true, default_value = "./config/answers.toml")]
    config: PathBuf,

    /// Log the retrieved context and request details to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive question loop.
    ///
    /// Prints a banner and sample questions, then answers one question per
    /// line of standard input until end of input.
    Chat,

    /// Answer a single question and print `A: <answer>`.
    ///
    /// Failures print an empty answer; the error goes to stderr.
    Answer {
        /// The question to answer.
        question: String,
    },

    /// Print the context that would be sent for a question.
    Context {
        /// The question to retrieve context for.
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config(&cli.config)?;
    cfg.answer.debug |= cli.debug;
    logging::init(cfg.answer.debug);

    let client = Arc::new(OpenAIClient::from_env(&cfg.openai)?);
    let generator = AnswerGenerator::new(cfg.answer.clone(), client.clone(), client);

    match cli.command {
        Commands::Chat => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            repl::run_chat(&generator, stdin.lock(), &mut stdout).await?;
        }
        Commands::Answer { question } => {
            let answer = generator.answer_or_empty(&question).await;
            println!("A: {}", answer);
        }
        Commands::Context { question } => match generator.context(&question).await {
            Ok(context) => println!("{}", context),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
