//! # CredHub Log
//!
//! Logging setup for the CredHub client binaries.
//!
//! Everything goes to stderr: stdout is reserved for credential output so that
//! `credhub get -n /foo | jq` keeps working with verbose logging turned on.
//!
//! ```rust,no_run
//! fn main() -> Result<(), credhub_log::Error> {
//!     let _guard = credhub_log::auto_init()?;
//!     tracing::info!(target_url = "https://credhub.example.com", "starting");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, LOG_ENV, LOG_FORMAT_ENV};

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for logger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filter directive could not be parsed
    #[error("Invalid filter '{filter}': {reason}")]
    Filter {
        /// The rejected directive string
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Initialize from `CREDHUB_LOG` / `RUST_LOG`, falling back to warnings only.
pub fn auto_init() -> Result<LoggerGuard> {
    init_with(Config::from_env())
}

/// Initialize with default configuration
pub fn init() -> Result<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> Result<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
