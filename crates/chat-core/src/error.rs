//! Error types for chat-cli.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ChatError> = std::result::Result<T, E>;

/// Errors surfaced to the caller of a conversation operation.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Missing credential or unusable settings. Fatal before any exchange.
    #[error("{0}")]
    Config(String),

    /// The completion service rejected the credential.
    #[error("Invalid OpenAI API key. Please set the OPENAI_API_KEY environment variable.")]
    Auth,

    /// The completion service signalled rate limiting.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimit,

    /// Any other remote failure: transport, unexpected status, malformed body.
    #[error("OpenAI API error: {0}")]
    Remote(String),
}

impl ChatError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit)
    }
}

/// Failures of the history file. `HistoryStore::load` and `HistoryStore::save`
/// log these and carry on; the `try_` variants hand them to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize conversation history: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
