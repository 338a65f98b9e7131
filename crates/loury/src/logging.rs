#![forbid(unsafe_code)]

//! Global log subscriber installation.
//!
//! Components only emit `tracing` events. A host that wants them on stderr
//! calls [`init`] once; a host that already owns a subscriber skips it and
//! the events flow into that subscriber instead.
//!
//! The filter comes from the `LOURY_LOG` environment variable when set
//! (standard `EnvFilter` directives such as `loury_fx=debug`), otherwise
//! from [`LoggingConfig::filter`].

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::{Error, Result};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "LOURY_LOG";

/// Build the filter: `LOURY_LOG` if it parses, else `fallback`, else `warn`.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set; the existing one is left in
/// place. Asking for JSON output without the `tracing-json` feature is also
/// an error.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(&config.filter);
    if config.json {
        init_json(filter)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| Error::Logging(e.to_string()))
    }
}

#[cfg(feature = "tracing-json")]
fn init_json(filter: EnvFilter) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(not(feature = "tracing-json"))]
fn init_json(_filter: EnvFilter) -> Result<()> {
    Err(Error::Logging(
        "JSON log output requires the `tracing-json` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_filter_is_used_when_env_unset() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        let filter = env_filter("loury_fx=debug");
        assert_eq!(filter.to_string(), "loury_fx=debug");
    }

    #[test]
    fn invalid_fallback_degrades_to_warn() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        let filter = env_filter("loury_fx=loud");
        assert_eq!(filter.to_string(), "warn");
    }
}
