//! Logger builder implementation

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    Error, Result,
    config::{Config, Format},
};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger alive for the duration of the command
#[derive(Debug)]
#[must_use = "dropping the guard ends the logging scope"]
pub struct LoggerGuard {
    _root_span: tracing::span::EnteredSpan,
}

macro_rules! fmt_layer {
    ($display:expr) => {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
            .with_thread_ids($display.thread_ids)
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse the configured filter without installing anything
    pub fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| Error::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    /// Build and install the global subscriber
    pub fn build(self) -> Result<LoggerGuard> {
        let filter = self.filter()?;
        let display = &self.config.display;

        let installed = match (self.config.format, display.time) {
            (Format::Pretty, true) => Registry::default()
                .with(filter)
                .with(fmt_layer!(display).pretty())
                .try_init(),
            (Format::Pretty, false) => Registry::default()
                .with(filter)
                .with(fmt_layer!(display).pretty().without_time())
                .try_init(),
            (Format::Compact, true) => Registry::default()
                .with(filter)
                .with(fmt_layer!(display).compact())
                .try_init(),
            (Format::Compact, false) => Registry::default()
                .with(filter)
                .with(fmt_layer!(display).compact().without_time())
                .try_init(),
            (Format::Json, _) => Registry::default()
                .with(filter)
                .with(
                    fmt_layer!(display)
                        .json()
                        .with_current_span(true)
                        .flatten_event(true),
                )
                .try_init(),
        };
        installed.map_err(|e| Error::AlreadyInitialized(e.to_string()))?;

        let root = tracing::info_span!("credhub", version = env!("CARGO_PKG_VERSION"));
        Ok(LoggerGuard {
            _root_span: root.entered(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let builder = LoggerBuilder::from_config(Config {
            level: "credhub=loudest".to_string(),
            ..Config::default()
        });
        let err = builder.filter().unwrap_err();
        assert!(matches!(err, Error::Filter { .. }));
        assert!(err.to_string().contains("credhub=loudest"));
    }

    #[test]
    fn directive_lists_parse() {
        let builder = LoggerBuilder::from_config(Config {
            level: "warn,credhub=debug,reqwest=info".to_string(),
            ..Config::default()
        });
        assert!(builder.filter().is_ok());
    }
}
