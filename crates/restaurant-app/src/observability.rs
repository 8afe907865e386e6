//! Tracing setup.
//!
//! A reloadable `EnvFilter` sits in front of the fmt layer. `RUST_LOG`, when
//! set to a parsable directive, takes precedence over `logging.level`; the
//! configured level only applies when it is absent.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

static FILTER_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Which setting produced the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// `RUST_LOG`.
    Environment,
    /// `logging.level` from configuration.
    Config,
}

/// Picks the filter for `configured`, letting a valid `rust_log` win.
pub fn select_filter(configured: &str, rust_log: Option<&str>) -> (EnvFilter, FilterSource) {
    if let Some(directives) = rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return (filter, FilterSource::Environment),
            Err(e) => eprintln!("ignoring invalid RUST_LOG '{directives}': {e}"),
        }
    }
    (EnvFilter::new(configured), FilterSource::Config)
}

fn env_filter(configured: &str) -> (EnvFilter, FilterSource) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    select_filter(configured, rust_log.as_deref())
}

/// Installs the global subscriber with `level` as the configured level.
///
/// A second call reuses the installed subscriber and swaps its filter.
pub fn init_tracing_with_level(level: &str) -> FilterSource {
    if FILTER_HANDLE.get().is_some() {
        return apply_logging_level(level);
    }

    let (filter, source) = env_filter(level);
    let (reload_layer, handle) = reload::Layer::new(filter);
    let _ = FILTER_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer())
        .try_init();
    source
}

/// Replaces the active filter after a configuration change.
///
/// `RUST_LOG` still wins; the configured level is ignored while it is set.
pub fn apply_logging_level(level: &str) -> FilterSource {
    let (filter, source) = env_filter(level);
    if let Some(handle) = FILTER_HANDLE.get()
        && let Err(e) = handle.modify(|f| *f = filter)
    {
        tracing::warn!(error = %e, "Failed to reload log filter");
    }
    source
}
