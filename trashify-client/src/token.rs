//! Token providers for authenticated requests.

use std::env;

use trashify_core::ports::TokenProvider;

/// Variable read by [`EnvTokenProvider::default`].
pub const ACCESS_TOKEN_VAR: &str = "TRASHIFY_ACCESS_TOKEN";

#[derive(Debug, Clone, Default)]
/// Always returns the same token.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn current_token(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone)]
/// Reads the token from an environment variable on every call, empty when unset.
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Provider reading `var`.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(ACCESS_TOKEN_VAR)
    }
}

impl TokenProvider for EnvTokenProvider {
    fn current_token(&self) -> String {
        env::var(&self.var).unwrap_or_default()
    }
}
