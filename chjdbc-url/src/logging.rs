//! Logging setup.
//!
//! The parser emits `tracing` events (`debug` per parse, `trace` per host,
//! `warn` for ignored option values). Nothing is printed unless a subscriber
//! is installed, either by the application or by [`init`] with the
//! `tracing-subscriber` feature.
//!
//! # Environment Variables
//!
//! - `CHJDBC_DEBUG=true|1|yes` - enable debug logging
//! - `CHJDBC_LOG_LEVEL=trace|debug|info|warn|error` - set the level
//! - `CHJDBC_LOG_FORMAT=json|pretty|compact` - output format (default: json)

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Whether `CHJDBC_DEBUG` is set to `true`, `1` or `yes`.
pub fn is_debug_enabled() -> bool {
    env::var("CHJDBC_DEBUG")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Log level from `CHJDBC_LOG_LEVEL`.
///
/// Falls back to `debug` when debug logging is enabled and `warn` otherwise.
pub fn log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("CHJDBC_LOG_LEVEL") {
        Ok(level) => match level.to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Output format from `CHJDBC_LOG_FORMAT`.
pub fn log_format() -> &'static str {
    env::var("CHJDBC_LOG_FORMAT")
        .map(|f| match f.to_ascii_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Install a global subscriber for the `chjdbc` crates.
///
/// Does nothing unless `CHJDBC_DEBUG` or `CHJDBC_LOG_LEVEL` is set, or
/// without the `tracing-subscriber` feature. Only the first call has an
/// effect.
pub fn init() {
    INIT.call_once(|| {
        install();
    });
}

/// Build the subscriber from the environment and try to install it.
///
/// Returns whether a global subscriber was installed by this call.
fn install() -> bool {
    if !is_debug_enabled() && env::var("CHJDBC_LOG_LEVEL").is_err() {
        return false;
    }
    try_install(log_level(), log_format())
}

#[cfg(feature = "tracing-subscriber")]
fn try_install(level: &str, format: &str) -> bool {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_new(format!("chjdbc={},chjdbc_url={}", level, level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        "json" => registry.with(fmt::layer().json()).try_init(),
        "compact" => registry.with(fmt::layer().compact()).try_init(),
        _ => registry.with(fmt::layer().pretty()).try_init(),
    }
    .is_ok();

    if installed {
        tracing::info!(level, format, "chjdbc logging initialized");
    }
    installed
}

#[cfg(not(feature = "tracing-subscriber"))]
fn try_install(_level: &str, _format: &str) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so every scenario runs in this one test.
    #[test]
    fn test_install_follows_env() {
        // SAFETY: no other test in this crate reads or writes these variables
        unsafe {
            env::remove_var("CHJDBC_DEBUG");
            env::remove_var("CHJDBC_LOG_LEVEL");
            env::remove_var("CHJDBC_LOG_FORMAT");
        }
        assert!(!is_debug_enabled());
        assert_eq!(log_level(), "warn");
        assert_eq!(log_format(), "json");
        assert!(!install());

        unsafe {
            env::set_var("CHJDBC_DEBUG", "YES");
        }
        assert!(is_debug_enabled());
        assert_eq!(log_level(), "debug");

        unsafe {
            env::set_var("CHJDBC_LOG_LEVEL", "Trace");
            env::set_var("CHJDBC_LOG_FORMAT", "compact");
        }
        assert_eq!(log_level(), "trace");
        assert_eq!(log_format(), "compact");

        #[cfg(feature = "tracing-subscriber")]
        {
            assert!(install());
            assert!(tracing::dispatcher::has_been_set());
            // a global subscriber can only be set once
            assert!(!install());
        }
        #[cfg(not(feature = "tracing-subscriber"))]
        assert!(!install());

        // `init` is a no-op after the first call
        init();
        init();

        unsafe {
            env::remove_var("CHJDBC_DEBUG");
            env::remove_var("CHJDBC_LOG_LEVEL");
            env::remove_var("CHJDBC_LOG_FORMAT");
        }
    }
}
