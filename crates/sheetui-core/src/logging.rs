#![forbid(unsafe_code)]

//! Log output setup for hosts that do not install their own subscriber.
//!
//! Library code only emits `tracing` events. Binaries and demos call one of
//! these once at startup. The filter comes from `RUST_LOG`, falling back to
//! `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a JSON line subscriber. Returns `false` if one was already set.
pub fn init_json() -> bool {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_current_span(true))
        .try_init()
        .is_ok()
}

/// Install a human-readable subscriber. Returns `false` if one was already set.
pub fn init_pretty() -> bool {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_subscriber_installs() {
        assert!(init_json());
        assert!(!init_pretty());
        assert!(!init_json());
        tracing::info!(message = "logging.ready");
    }
}
