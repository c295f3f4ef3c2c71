use std::fmt::Debug;

/// The token object attached to outbound user-info requests.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential {
    value: String,
    token_type: String,
}

impl BearerCredential {
    #[must_use]
    pub fn new(value: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            token_type: token_type.into(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Value of the `Authorization` header carrying this credential.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

impl Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerCredential")
            .field("value", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Single-slot cache of the credential attached to a user-info session.
///
/// The slot is keyed by the credential's token value and holds at most one
/// credential. Presenting a different access token replaces
/// the slot; presenting the cached one reuses it.
#[derive(Debug, Default)]
pub(crate) struct CredentialCache {
    current: Option<BearerCredential>,
}

impl CredentialCache {
    /// Returns the credential for `access_token`, attaching a new one if the
    /// slot is empty or holds a different token.
    pub(crate) fn attach(&mut self, access_token: &str, token_type: &str) -> &BearerCredential {
        let cached = match self.current.take() {
            Some(cached) if cached.value() == access_token => {
                tracing::trace!("Reusing attached user info credential");
                cached
            }
            _ => {
                tracing::trace!("Attaching new user info credential");
                BearerCredential::new(access_token, token_type)
            }
        };
        self.current.insert(cached)
    }

    #[cfg(test)]
    pub(crate) fn cached_token(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(BearerCredential::value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let credential = BearerCredential::new("abc", "Bearer");
        assert_eq!(credential.authorization_header(), "Bearer abc");
    }

    #[test]
    fn test_debug_redacts_value() {
        let credential = BearerCredential::new("abc", "Bearer");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("abc"));
        assert!(debug.contains("Bearer"));
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = CredentialCache::default();
        assert_eq!(cache.cached_token(), None);
    }

    #[test]
    fn test_cache_reuses_same_token() {
        let mut cache = CredentialCache::default();
        let first = cache.attach("token-a", "Bearer").clone();
        // A changed token type is ignored while the token stays the same.
        let second = cache.attach("token-a", "bearer").clone();

        assert_eq!(first, second);
        assert_eq!(second.token_type(), "Bearer");
        assert_eq!(cache.cached_token(), Some("token-a"));
    }

    #[test]
    fn test_cache_replaces_different_token() {
        let mut cache = CredentialCache::default();
        cache.attach("token-a", "Bearer");
        let credential = cache.attach("token-b", "Bearer").clone();

        assert_eq!(credential.value(), "token-b");
        assert_eq!(cache.cached_token(), Some("token-b"));
    }
}
