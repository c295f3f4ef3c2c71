//! Outbound calls to the user-info endpoint.

use reqwest::header::{ACCEPT, AUTHORIZATION};

use crate::{
    config::ResolverConfig,
    credential::CredentialCache,
    error::{Error, RemoteFetchError, Result},
    principal::value_as_string,
};

/// Key the user-info endpoint uses to signal an unrecognized token.
pub(crate) const ERROR_KEY: &str = "error";

/// User-info payload as received from the identity endpoint.
pub type RawUserInfo = serde_json::Map<String, serde_json::Value>;

/// HTTP client for the user-info endpoint.
///
/// The client itself is immutable and cheap to clone; outbound credentials
/// live in a [`UserInfoSession`] that is opened per resolve call.
#[derive(Clone)]
pub struct UserInfoClient {
    http: reqwest::Client,
    client_id: String,
    token_type: String,
}

impl UserInfoClient {
    /// Create a client with timeouts and user agent taken from `config`.
    ///
    /// # Errors
    /// - If the underlying HTTP client cannot be built (e.g. TLS backend initialization fails).
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| Error::internal("Failed to build user info HTTP client", e))?;

        Ok(Self::with_http_client(config, http))
    }

    /// Create a client around an existing [`reqwest::Client`].
    /// Timeouts of `config` are not applied; configure them on `http`.
    #[must_use]
    pub fn with_http_client(config: &ResolverConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            token_type: config.token_type.clone(),
        }
    }

    /// Replace the underlying [`reqwest::Client`], keeping client id and token type.
    /// Timeouts configured in [`ResolverConfig`] do not apply to `http`.
    #[must_use]
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Open a session with an empty credential slot.
    #[must_use]
    pub fn session(&self) -> UserInfoSession<'_> {
        UserInfoSession {
            client: self,
            credentials: CredentialCache::default(),
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn get(
        &self,
        endpoint: &url::Url,
        authorization: String,
    ) -> Result<RawUserInfo, RemoteFetchError> {
        let response = self
            .http
            .get(endpoint.clone())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(RemoteFetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status { status });
        }

        let user_info = response
            .json::<RawUserInfo>()
            .await
            .map_err(RemoteFetchError::Decode)?;

        if let Some(reason) = user_info.get(ERROR_KEY) {
            return Err(RemoteFetchError::Rejected {
                reason: value_as_string(reason),
            });
        }

        Ok(user_info)
    }
}

impl std::fmt::Debug for UserInfoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInfoClient")
            .field("client_id", &self.client_id)
            .field("token_type", &self.token_type)
            .field("http", &"reqwest::Client")
            .finish()
    }
}

/// Request-scoped view of a [`UserInfoClient`] holding the attached credential.
///
/// Sessions are not shared between requests, so concurrent resolve calls
/// never observe each other's credential.
#[derive(Debug)]
pub struct UserInfoSession<'a> {
    client: &'a UserInfoClient,
    credentials: CredentialCache,
}

impl UserInfoSession<'_> {
    /// Fetch the user info for `access_token` from `endpoint`.
    ///
    /// The credential is only re-attached if `access_token` differs from the one
    /// used by the previous fetch of this session. The slot is updated whether
    /// or not the fetch succeeds.
    ///
    /// # Errors
    /// - [`RemoteFetchError::Transport`]: network failure or timeout.
    /// - [`RemoteFetchError::Status`]: non-2xx response.
    /// - [`RemoteFetchError::Decode`]: body is not a JSON object.
    /// - [`RemoteFetchError::Rejected`]: body contains an `error` key.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(endpoint = %endpoint, client_id = %self.client.client_id)
    )]
    pub async fn fetch_user_info(
        &mut self,
        endpoint: &url::Url,
        access_token: &str,
    ) -> Result<RawUserInfo, RemoteFetchError> {
        tracing::debug!("Getting user info from: {endpoint}");
        let authorization = self
            .credentials
            .attach(access_token, &self.client.token_type)
            .authorization_header();

        let result = self.client.get(endpoint, authorization).await;
        match &result {
            Err(RemoteFetchError::Rejected { .. }) | Ok(_) => {}
            Err(e) => tracing::info!(category = e.category(), "{e}"),
        }
        result
    }
}
