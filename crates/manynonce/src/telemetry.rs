//! Tracing subscriber setup for applications embedding the transform.
//!
//! The library only emits `tracing` events (layer counts, byte lengths, error
//! codes). No key, nonce or plaintext bytes appear in any field.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise a global tracing subscriber writing structured JSON logs.
///
/// `RUST_LOG`, when set, overrides `log_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise manynonce tracing subscriber: {e}"))
}
