//! Log output for the `ask` binary.
//!
//! Logs go to stderr so stdout carries only answers. `RUST_LOG` takes
//! precedence over the default filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `--debug` raises only this crate to `debug`; HTTP internals stay at `warn`.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "warn,answer_harness=debug"
    } else {
        "warn"
    }
}

pub fn init(debug: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}
