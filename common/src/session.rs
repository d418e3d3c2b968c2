//! Explicit session context.
//!
//! The token is the only durable client state. It lives in one key of a
//! [`TokenStore`] (browser local storage in production) and is mirrored in a
//! [`Session`] value that is handed to the API client, instead of every
//! request reaching into storage on its own.

use crate::model::User;

/// Storage key holding the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "casedocs.token";

/// A single persistent key-value slot for the token.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Trims a token and strips an accidental `Bearer ` prefix. Blank tokens are
/// treated as absent.
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed)
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// Restores the session from storage. The user is unknown until `/auth/me`
    /// answers; see [`Session::with_user`].
    pub fn init(store: &impl TokenStore) -> Self {
        let token = store.load().as_deref().and_then(normalize_token);
        if token.is_none() {
            store.clear();
        }
        Self { token, user: None }
    }

    pub fn login(store: &impl TokenStore, token: &str, user: Option<User>) -> Option<Self> {
        let token = normalize_token(token)?;
        store.save(&token);
        Some(Self {
            token: Some(token),
            user,
        })
    }

    /// Clears both the in-memory context and persisted storage.
    pub fn teardown(&mut self, store: &impl TokenStore) {
        self.token = None;
        self.user = None;
        store.clear();
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}
