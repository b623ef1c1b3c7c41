use std::io;

/// Crate-wide result type, defaulting to [`SinoParserError`].
pub type Result<T, E = SinoParserError> = std::result::Result<T, E>;

/// Errors raised while loading lexicon or conversion data.
///
/// All variants are load-time conditions. Query-time lookups never fail:
/// unknown characters degrade to per-token fallbacks instead.
#[derive(Debug, thiserror::Error)]
pub enum SinoParserError {
    /// Self-contradictory lexicon data detected at load time. Fatal; the
    /// process must not serve queries against an inconsistent lexicon.
    #[error("inconsistent lexicon data: {0}")]
    Configuration(String),

    /// A dictionary file whose content is not in the expected format.
    #[error("invalid dictionary format in {path}: {msg}")]
    InvalidFormat { path: String, msg: String },

    /// Standard I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
