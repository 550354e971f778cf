//! Traits describing the controller's collaborators and their shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

use crate::model::{DisposalPoint, SearchQuery};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while searching for nearby disposal points.
pub enum SearchError {
    /// Connection, DNS, timeout, or request construction failed.
    #[error("Network error: {0}")]
    Transport(#[from] ReqwestError),
    /// Response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(#[from] JsonError),
    /// Server answered without results; carries its message.
    #[error("{0}")]
    Remote(String),
    /// Query was rejected before any request was made.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Fieldless tag of a [`SearchError`].
pub enum SearchErrorKind {
    /// See [`SearchError::Transport`].
    Transport,
    /// See [`SearchError::Decode`].
    Decode,
    /// See [`SearchError::Remote`].
    Remote,
    /// See [`SearchError::InvalidQuery`].
    InvalidQuery,
}

impl SearchError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            Self::Transport(_) => SearchErrorKind::Transport,
            Self::Decode(_) => SearchErrorKind::Decode,
            Self::Remote(_) => SearchErrorKind::Remote,
            Self::InvalidQuery(_) => SearchErrorKind::InvalidQuery,
        }
    }
}

/// Source of the bearer token attached to authenticated requests.
pub trait TokenProvider: Send + Sync {
    /// Current token. May be empty when the user is signed out.
    fn current_token(&self) -> String;
}

#[async_trait]
/// Backend that answers proximity searches.
pub trait ProximitySearch: Send + Sync {
    /// Fetch disposal points matching `query`, authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] when the request fails, the response cannot be
    /// decoded, or the server reports no results.
    async fn fetch(&self, query: &SearchQuery, token: &str)
    -> Result<Vec<DisposalPoint>, SearchError>;
}
