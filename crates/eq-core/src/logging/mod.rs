//! Structured logging for eqstats.
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the embedding program. [`init_logging`] installs the stock one:
//! - human-readable lines on stderr, or
//! - one JSON object per event on stderr
//!
//! ```no_run
//! use eq_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env());
//! ```
//!
//! `RUST_LOG` takes precedence over the configured level when set, so
//! per-module directives such as `eq_core::stattests=debug` work.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel, LOG_FORMAT_ENV, LOG_LEVEL_ENV};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global subscriber built from `config`.
///
/// Returns `false` if a global subscriber was already set; the existing one
/// is left in place, so repeated calls are harmless.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.level)));

    match config.format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
                    .is_ok()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
                    .is_ok()
            }
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .flatten_event(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
    }
}

/// [`init_logging`] with [`LogConfig::from_env`].
pub fn init_default_logging() -> bool {
    init_logging(&LogConfig::from_env())
}

fn default_directive(level: LogLevel) -> String {
    format!("eq_core={level},eq_math={level}")
}
