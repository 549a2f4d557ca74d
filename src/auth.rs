//! The authentication seam.
//!
//! Credential acquisition (OAuth flows, token persistence) lives
//! outside this crate; the core only asks an [`AuthProvider`] for a
//! bearer token at request time. The original notion of an ambient
//! "global user" is modeled as an explicit default inside
//! [`TokenStore`] rather than process-wide state.

use std::collections::HashMap;

/// Supplies bearer tokens for acting users.
///
/// Implementations must be safe for concurrent reads; the client calls
/// this from any number of in-flight requests.
pub trait AuthProvider: Send + Sync {
    /// The bearer token for `user_id`, or for the default user when
    /// `None`. Returning `None` means the request goes out
    /// unauthenticated, which is valid for public queries.
    fn token_for(&self, user_id: Option<&str>) -> Option<String>;
}

/// Provider for purely public queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn token_for(&self, _user_id: Option<&str>) -> Option<String> {
        None
    }
}

/// A single token used for every request, regardless of user.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Create a provider around one bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AuthProvider for StaticToken {
    fn token_for(&self, _user_id: Option<&str>) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Tokens for several users, with an explicit default user.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: HashMap<String, String>,
    default_user: Option<String>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a user.
    pub fn insert(&mut self, user_id: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(user_id.into(), token.into());
    }

    /// Mark the user whose token answers requests with no explicit user.
    pub fn set_default_user(&mut self, user_id: impl Into<String>) {
        self.default_user = Some(user_id.into());
    }

    /// Clear the default user.
    pub fn clear_default_user(&mut self) {
        self.default_user = None;
    }
}

impl AuthProvider for TokenStore {
    fn token_for(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = match user_id {
            Some(user_id) => user_id,
            None => self.default_user.as_deref()?,
        };
        self.tokens.get(user_id).cloned()
    }
}
