//! # Logging
//!
//! Diagnostics go through `tracing`. This module installs a formatted
//! subscriber and offers the four leveled helpers used by applications:
//! [`info`], [`success`], [`warning`] and [`error`].
//!
//! `success` is an info-level record tagged `outcome = "success"`, so a
//! subscriber can style or filter it separately.

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::{EcsError, EcsResult};

/// Subscriber settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Decorate output with ANSI colors.
    pub colors: bool,
    /// Prefix each line with a timestamp.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colors: true,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Parses [`LogConfig::level`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] for an unknown level name.
    pub fn level_filter(&self) -> EcsResult<LevelFilter> {
        self.level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| EcsError::InvalidConfig(format!("unknown log level {:?}", self.level)))
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// # Errors
///
/// Returns [`EcsError::InvalidConfig`] if the level is unknown or a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> EcsResult<()> {
    let level = config.level_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(config.colors)
        .with_target(false);

    let installed = if config.timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };

    installed.map_err(|e| EcsError::InvalidConfig(format!("logging already initialized: {e}")))
}

/// Logs an informational message.
pub fn info(message: &str) {
    tracing::info!("{}", message);
}

/// Logs a successful outcome.
pub fn success(message: &str) {
    tracing::info!(outcome = "success", "{}", message);
}

/// Logs a recoverable problem.
pub fn warning(message: &str) {
    tracing::warn!("{}", message);
}

/// Logs a failure.
pub fn error(message: &str) {
    tracing::error!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture<F: FnOnce()>(level: LevelFilter, f: F) -> String {
        let sink = Capture::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        sink.text()
    }

    #[test]
    fn test_helpers_emit_leveled_records() {
        let out = capture(LevelFilter::TRACE, || {
            info("loading");
            success("loaded");
            warning("slow frame");
            error("lost entity");
        });

        assert!(out.contains("INFO") && out.contains("loading"));
        assert!(out.contains("outcome=\"success\"") && out.contains("loaded"));
        assert!(out.contains("WARN") && out.contains("slow frame"));
        assert!(out.contains("ERROR") && out.contains("lost entity"));
    }

    #[test]
    fn test_max_level_filters_records() {
        let out = capture(LevelFilter::WARN, || {
            info("hidden");
            warning("shown");
        });

        assert!(!out.contains("hidden"));
        assert!(out.contains("shown"));
    }

    #[test]
    fn test_level_parsing() {
        let mut config = LogConfig::default();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::INFO);

        config.level = "off".into();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::OFF);

        config.level = "loud".into();
        assert!(matches!(config.level_filter(), Err(EcsError::InvalidConfig(_))));
        assert!(matches!(init(&config), Err(EcsError::InvalidConfig(_))));
    }
}
