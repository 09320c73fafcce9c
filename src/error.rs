//! Error types for the search pipeline.
//!
//! All fallible operations in the crate return [`Result`], built on a single
//! [`ScoutError`] enum. Malformed model replies are deliberately collapsed
//! into one user-facing variant, [`ScoutError::ContentNotAvailable`], whose
//! `Display` text is shown to the user verbatim; transport and storage
//! failures keep their underlying error text instead.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Errors that can occur while searching, storing, or exporting articles.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// The model reply could not be turned into a usable article list.
    ///
    /// Covers replies that are not JSON, not an array, an empty array, or an
    /// array containing an article with a missing or empty field. The display
    /// text is the exact message shown to the user.
    #[error("Content not available. Try choosing a bigger timeframe or different topics.")]
    ContentNotAvailable,

    /// The completion endpoint answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The completion envelope parsed but contained no choices.
    #[error("completion response contained no choices")]
    EmptyCompletion,

    /// A second search was started while one was still running.
    #[error("a search is already running")]
    SearchInFlight,

    /// No API key was found on the command line, environment, or config file.
    #[error("no API key configured; pass --api-key, set PERPLEXITY_API_KEY, or add api_key to the config file")]
    MissingApiKey,

    /// The topics input was empty or all whitespace.
    #[error("enter at least one topic to search")]
    EmptyTopics,

    /// A history index did not correspond to a saved search.
    #[error("no history entry at position {index}")]
    NoSuchHistoryEntry { index: usize },

    /// A config file field failed validation.
    #[error("invalid config: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// No platform data directory could be determined.
    #[error("could not determine a data directory; set data_dir in the config file")]
    NoDataDir,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
