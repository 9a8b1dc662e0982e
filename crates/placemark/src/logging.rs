//! Tracing setup for the binary.
//!
//! Console output goes to stderr, either human-readable or JSON. An optional
//! log file receives the same events without ANSI colors.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const DEFAULT_DIRECTIVE: &str = "placemark=info";
const DEBUG_DIRECTIVE: &str = "placemark=debug";
const QUIET_DIRECTIVE: &str = "placemark=warn";

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub debug: bool,
    pub quiet: bool,
    pub json: bool,
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            DEBUG_DIRECTIVE
        } else if self.quiet {
            QUIET_DIRECTIVE
        } else {
            DEFAULT_DIRECTIVE
        }
    }

    fn filter(&self) -> EnvFilter {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()));
        if self.debug {
            // --debug wins over a quieter RUST_LOG for our own target.
            match DEBUG_DIRECTIVE.parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => filter,
            }
        } else {
            filter
        }
    }
}

/// Install the global subscriber. Fails only if the log file cannot be created.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let console = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .boxed()
    };

    let file_layer = match &config.file {
        Some(path) => {
            let file = File::create(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(console)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(LogConfig::default().default_directive(), "placemark=info");

        let debug = LogConfig {
            debug: true,
            quiet: true,
            ..Default::default()
        };
        assert_eq!(debug.default_directive(), "placemark=debug");

        let quiet = LogConfig {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(quiet.default_directive(), "placemark=warn");
    }
}
