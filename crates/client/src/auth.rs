//! Bearer-token store for authenticated API calls.
//!
//! The token is managed upstream (login/refresh flows live outside this
//! crate); the API client only reads it when building request headers.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};

/// Shared holder for the current bearer token.
///
/// Cheaply cloneable; all clones observe the same token.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl TokenStore {
    /// Create an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current token.
    pub fn set(&self, token: SecretString) {
        *self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the current token (logout).
    pub fn clear(&self) {
        *self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a token is currently present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The `Authorization` header value, if a token is present.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("token", &self.is_authenticated().then_some("[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = TokenStore::new();
        assert!(!store.is_authenticated());
        assert!(store.bearer().is_none());
    }

    #[test]
    fn test_set_and_clear() {
        let store = TokenStore::new();
        store.set(SecretString::from("abc123"));
        assert!(store.is_authenticated());
        assert_eq!(store.bearer().as_deref(), Some("Bearer abc123"));

        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.bearer().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = TokenStore::new();
        let clone = store.clone();
        store.set(SecretString::from("shared"));
        assert_eq!(clone.bearer().as_deref(), Some("Bearer shared"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = TokenStore::new();
        store.set(SecretString::from("super_secret"));
        let debug_output = format!("{store:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret"));
    }
}
