//! Crate-level error types.
//!
//! Only startup and configuration paths return errors. The display core
//! (refresh, animation, presentation, docking) handles its failures locally
//! and keeps showing the last good content.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TickerError>;

/// Errors returned by fallible public APIs.
#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    /// A configuration file could not be read or written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON for [`TickerConfig`](crate::TickerConfig).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The price source's HTTP client could not be built.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal setup or restore failed.
    #[error("terminal error: {0}")]
    Terminal(std::io::Error),
}
