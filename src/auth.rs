use std::sync::RwLock;

/// Credential store shared between a [`crate::Client`] and its callers.
///
/// Holds at most one bearer token and one API key. During request dispatch
/// the store is only read; the token is preferred when both are set.
#[derive(Debug, Default)]
pub struct AuthStore {
    inner: RwLock<Credentials>,
}

#[derive(Debug, Default)]
struct Credentials {
    token: Option<String>,
    key: Option<String>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bearer token, e.g. one obtained from a login flow.
    pub fn set_token(&self, token: impl Into<String>) {
        self.write().token = Some(token.into());
    }

    /// Store an API key.
    pub fn set_key(&self, key: impl Into<String>) {
        self.write().key = Some(key.into());
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn key(&self) -> Option<String> {
        self.read().key.clone()
    }

    /// Drop all stored credentials (logout).
    pub fn clear(&self) {
        let mut creds = self.write();
        creds.token = None;
        creds.key = None;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Credentials> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Credentials> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_clears_credentials() {
        let store = AuthStore::new();
        assert!(store.token().is_none());
        assert!(store.key().is_none());

        store.set_token("tok");
        store.set_key("key");
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.key().as_deref(), Some("key"));

        store.clear();
        assert!(store.token().is_none());
        assert!(store.key().is_none());
    }
}
