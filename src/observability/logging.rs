//! # Logging
//!
//! Installs a `tracing-subscriber` formatter the first time a client is
//! created. Output goes to stderr so it never mixes with payloads a host
//! CLI might write to stdout.
//!
//! The filter comes from `SMC_LOG` (same syntax as `RUST_LOG`) and defaults
//! to warnings from this crate only. If the host process already installed
//! a global subscriber, that one is kept.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

use crate::constants::{DEFAULT_LOG_FILTER, ENV_LOG};

static LOGGING_INIT: Once = Once::new();

/// Install the default subscriber at most once per process
pub fn init_logging() {
    LOGGING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(ENV_LOG)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // try_init fails when a global subscriber already exists; keep the host's
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already installed, keeping it");
        }
    });
}
