//! Authenticate opaque tokens by exchanging them at a remote user-info endpoint.

use std::sync::Arc;

use crate::{
    authorities::{AuthoritiesExtractor, FixedAuthoritiesExtractor},
    client::UserInfoClient,
    config::ResolverConfig,
    error::{Error, Result},
    principal::extract_principal,
    request::extract_request_context,
    AuthenticationContext, BearerCredential, TokenResolver,
};

#[derive(Clone)]
/// Resolve opaque access tokens via the user-info endpoint of an `IdP`.
///
/// Every [`resolve`](Self::resolve) call sends one `GET` to the configured
/// `user_info_uri` with the token attached as bearer credential. Nothing is
/// retried and no state is shared between calls, so a single resolver can be
/// cloned into all request handlers.
///
/// **Payload Field Mappings**:
/// - `principal`: first of `user`, `username`, `userid`, `user_id`, `login`, `id`, `name`, or `unknown`
/// - `client_id`: `oauth2Request.clientId`
/// - `scopes`: `oauth2Request.scope`
/// - `authorities`: the configured [`AuthoritiesExtractor`], `ROLE_USER` by default
/// - `details`: the whole payload
///
pub struct UserInfoTokenResolver {
    user_info_uri: url::Url,
    client: UserInfoClient,
    authorities_extractor: Arc<dyn AuthoritiesExtractor>,
}

impl UserInfoTokenResolver {
    /// Create a new [`UserInfoTokenResolver`].
    ///
    /// # Errors
    /// - [`Error::InvalidConfiguration`] if the `user_info_uri` is not an http(s) URL or the token type is empty.
    /// - [`Error::InternalError`] if the HTTP client cannot be built.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        validate_config(config)?;
        Ok(Self {
            user_info_uri: config.user_info_uri.clone(),
            client: UserInfoClient::new(config)?,
            authorities_extractor: Arc::new(FixedAuthoritiesExtractor::default()),
        })
    }

    /// Create a new [`UserInfoTokenResolver`] from a user-info URL and client id
    /// using default settings for everything else.
    ///
    /// # Errors
    /// - If `user_info_uri` cannot be parsed.
    /// - See [`UserInfoTokenResolver::new`].
    pub fn from_uri(user_info_uri: &str, client_id: &str) -> Result<Self> {
        let config = ResolverConfig::builder()
            .user_info_uri(url::Url::parse(user_info_uri)?)
            .client_id(client_id)
            .build();
        Self::new(&config)
    }

    /// Use an existing [`reqwest::Client`] for user-info requests.
    /// Timeouts configured in [`ResolverConfig`] do not apply to it.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.client = self.client.with_http(http);
        self
    }

    /// Replace the strategy deriving authorities from the payload.
    #[must_use]
    pub fn with_authorities_extractor(
        mut self,
        authorities_extractor: impl AuthoritiesExtractor + 'static,
    ) -> Self {
        self.authorities_extractor = Arc::new(authorities_extractor);
        self
    }

    #[must_use]
    pub fn user_info_uri(&self) -> &url::Url {
        &self.user_info_uri
    }

    /// Exchange `access_token` for user info and build the authentication context.
    ///
    /// Dropping the returned future aborts the in-flight request.
    ///
    /// # Errors
    /// - [`Error::InvalidCredentials`] if the endpoint rejects the token or cannot be reached.
    /// - [`Error::MalformedUserInfo`] if the payload has no valid `oauth2Request`.
    #[tracing::instrument(level = "debug", skip_all, fields(client_id = %self.client.client_id()))]
    pub async fn resolve(&self, access_token: &str) -> Result<AuthenticationContext> {
        let user_info = match self
            .client
            .session()
            .fetch_user_info(&self.user_info_uri, access_token)
            .await
        {
            Ok(user_info) => user_info,
            Err(e) => {
                tracing::debug!("Userinfo returned error: {e}");
                return Err(Error::invalid_credentials(access_token));
            }
        };

        let principal = extract_principal(&user_info);
        let (client_id, scopes) = extract_request_context(&user_info)?.into_parts();
        let authorities = self.authorities_extractor.extract_authorities(&user_info);

        Ok(AuthenticationContext::builder()
            .principal(principal)
            .authorities(authorities)
            .client_id(client_id)
            .scopes(scopes)
            .details(user_info)
            .build())
    }

    /// Always fails: tokens can be authenticated but not reconstructed.
    ///
    /// # Errors
    /// - Always [`Error::NotSupported`].
    pub fn read_access_token(&self, _access_token: &str) -> Result<BearerCredential> {
        Err(Error::NotSupported {
            operation: "read access token",
        })
    }
}

impl TokenResolver for UserInfoTokenResolver {
    async fn resolve(&self, access_token: &str) -> Result<AuthenticationContext> {
        UserInfoTokenResolver::resolve(self, access_token).await
    }

    fn read_access_token(&self, access_token: &str) -> Result<BearerCredential> {
        UserInfoTokenResolver::read_access_token(self, access_token)
    }
}

fn validate_config(config: &ResolverConfig) -> Result<()> {
    if !matches!(config.user_info_uri.scheme(), "http" | "https") {
        return Err(Error::InvalidConfiguration {
            reason: format!(
                "user_info_uri must use http or https, got `{}`",
                config.user_info_uri.scheme()
            ),
        });
    }

    if config.token_type.trim().is_empty() {
        return Err(Error::InvalidConfiguration {
            reason: "token_type must not be empty".to_string(),
        });
    }

    Ok(())
}

impl std::fmt::Debug for UserInfoTokenResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInfoTokenResolver")
            .field("user_info_uri", &self.user_info_uri)
            .field("client", &self.client)
            .field("authorities_extractor", &"dyn AuthoritiesExtractor")
            .finish()
    }
}
