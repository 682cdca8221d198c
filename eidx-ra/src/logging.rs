//! Tracing setup
//!
//! The subscriber is installed before configuration is read, so config
//! loading can log. Its filter starts from `RUST_LOG` or the compiled default
//! and is swapped for the configured level once that is resolved.

use eidx_common::config::CompiledDefaults;
use eidx_common::{Error, Result};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Handle for replacing the active log filter
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// True when the operator set `RUST_LOG`, which outranks configuration
fn rust_log_is_set() -> bool {
    std::env::var("RUST_LOG").map_or(false, |v| !v.trim().is_empty())
}

/// Filter used until configuration is resolved
pub fn startup_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(CompiledDefaults::default().log_level))
}

/// Install the global subscriber and return its filter handle
pub fn init_tracing() -> FilterHandle {
    let (filter, handle) = reload::Layer::new(startup_filter());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    handle
}

/// Switch to the configured log level unless `RUST_LOG` is set
///
/// Returns whether the filter was replaced.
pub fn apply_configured_level(handle: &FilterHandle, level: &str) -> Result<bool> {
    if rust_log_is_set() {
        return Ok(false);
    }

    let filter = EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level {:?}: {}", level, e)))?;
    handle
        .reload(filter)
        .map_err(|e| Error::Internal(format!("Log filter reload failed: {}", e)))?;

    Ok(true)
}
