//! Default `tracing` subscriber
//!
//! Libraries should not install subscribers; this is a convenience for
//! binaries and notebooks that just want readable logs.

use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered at `level`, unless `RUST_LOG` says
/// otherwise.
///
/// Returns `false` when a global subscriber was already set.
pub fn init_default_subscriber(level: LogLevel) -> bool {
    let level: tracing::Level = level.into();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .is_ok()
}
