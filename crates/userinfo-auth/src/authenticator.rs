use crate::{client::RawUserInfo, error::Result, BearerCredential};
use core::future::Future;
use indexmap::IndexSet;
use serde::Serialize;
use typed_builder::TypedBuilder;

pub trait TokenResolver
where
    Self: Send + Sync + Clone,
{
    /// Authenticate an opaque access token.
    /// Implementations may connect to the `IdP` to exchange the token.
    ///
    /// # Errors
    /// - [`Error::InvalidCredentials`](crate::error::Error::InvalidCredentials): Token is not valid.
    fn resolve(&self, access_token: &str)
        -> impl Future<Output = Result<AuthenticationContext>> + Send;

    /// Reconstruct the token object from its string form.
    ///
    /// # Errors
    /// - [`Error::NotSupported`](crate::error::Error::NotSupported) if the resolver cannot read tokens.
    fn read_access_token(&self, access_token: &str) -> Result<BearerCredential>;
}

#[derive(Debug, PartialEq, Eq, Clone, TypedBuilder, Serialize)]
#[serde(rename_all = "camelCase")]
/// Information about a successful authentication.
/// Immutable once built; all fields are exposed through accessors only.
pub struct AuthenticationContext {
    /// Identity of the caller.
    #[builder(setter(into))]
    principal: String,
    /// Coarse-grained permission labels.
    authorities: IndexSet<String>,
    /// Client the token was originally issued to. May be empty.
    #[builder(default, setter(into))]
    client_id: String,
    /// Scopes granted to the token, in the order the `IdP` reported them.
    #[builder(default)]
    scopes: IndexSet<String>,
    /// The user-info payload the context was derived from.
    details: RawUserInfo,
}

impl AuthenticationContext {
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    #[must_use]
    pub fn authorities(&self) -> &IndexSet<String> {
        &self.authorities
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn scopes(&self) -> &IndexSet<String> {
        &self.scopes
    }

    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    #[must_use]
    /// Get the raw user-info payload.
    pub fn details(&self) -> &RawUserInfo {
        &self.details
    }

    #[must_use]
    /// Get a single field of the raw user-info payload.
    /// If the field does not exist, this will return None.
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.get(key)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> AuthenticationContext {
        let details: RawUserInfo = serde_json::from_value(serde_json::json!({
            "name": "alice",
            "oauth2Request": {"clientId": "browser", "scope": ["ui", "server"]}
        }))
        .unwrap();

        AuthenticationContext::builder()
            .principal("alice")
            .authorities(IndexSet::from(["ROLE_USER".to_string()]))
            .client_id("browser")
            .scopes(IndexSet::from(["ui".to_string(), "server".to_string()]))
            .details(details)
            .build()
    }

    #[test]
    fn test_accessors() {
        let context = context();
        assert_eq!(context.principal(), "alice");
        assert!(context.has_authority("ROLE_USER"));
        assert!(!context.has_authority("ROLE_ADMIN"));
        assert_eq!(context.client_id(), "browser");
        assert!(context.has_scope("server"));
        assert_eq!(context.detail("name"), Some(&serde_json::json!("alice")));
        assert_eq!(context.detail("email"), None);
    }

    #[test]
    fn test_serialization_keeps_scope_order() {
        let serialized = serde_json::to_string(&context()).unwrap();
        assert_eq!(
            serialized,
            r#"{"principal":"alice","authorities":["ROLE_USER"],"clientId":"browser","scopes":["ui","server"],"details":{"name":"alice","oauth2Request":{"clientId":"browser","scope":["ui","server"]}}}"#
        );
    }

    #[test]
    fn test_builder_defaults() {
        let context = AuthenticationContext::builder()
            .principal("unknown")
            .authorities(IndexSet::new())
            .details(RawUserInfo::new())
            .build();
        assert_eq!(context.client_id(), "");
        assert!(context.scopes().is_empty());
    }
}
