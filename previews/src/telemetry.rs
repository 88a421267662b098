//! Logging setup for a preview run.
//!
//! The subscriber is built as a [`Dispatch`] handle rather than installed
//! globally; the binary scopes it to the run with
//! `tracing::dispatcher::with_default`. `RUST_LOG` overrides the default
//! `info` filter.

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Directive behind [`default_filter`].
pub const DEFAULT_FILTER: &str = "info";

/// Filter used when `RUST_LOG` is unset or invalid.
pub fn default_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter())
}

/// Console logging dispatcher for one run.
pub fn dispatch() -> Dispatch {
    dispatch_with(env_filter())
}

pub fn dispatch_with(filter: EnvFilter) -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    Dispatch::new(subscriber)
}
