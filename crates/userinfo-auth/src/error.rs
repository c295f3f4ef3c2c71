pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The identity endpoint did not accept the access token.
    /// The offending token is kept for diagnostics but never rendered by `Display`.
    #[error("Invalid access token.")]
    InvalidCredentials { token: String },
    #[error("Malformed user info response: {reason}")]
    MalformedUserInfo { reason: String },
    #[error("Not supported: {operation}")]
    NotSupported { operation: &'static str },
    #[error("Invalid resolver configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("Internal error. {reason}.")]
    InternalError {
        reason: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn invalid_credentials(token: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            token: token.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedUserInfo {
            reason: reason.into(),
        }
    }

    pub fn internal(
        reason: impl Into<String>,
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InternalError {
            reason: reason.into(),
            source: error.into(),
        }
    }

    /// The rejected access token, if this is an [`Error::InvalidCredentials`].
    #[must_use]
    pub fn rejected_token(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials { token } => Some(token),
            _ => None,
        }
    }
}

/// Failure talking to the user-info endpoint.
///
/// This never leaves the resolver: [`crate::UserInfoTokenResolver::resolve`]
/// turns every variant into [`Error::InvalidCredentials`].
#[derive(Debug, thiserror::Error)]
pub enum RemoteFetchError {
    #[error("Could not fetch user details: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Could not fetch user details: endpoint responded with status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("Could not fetch user details: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("User info endpoint rejected the token: {reason}")]
    Rejected { reason: String },
}

impl RemoteFetchError {
    /// Short label of the failure kind, used in logs.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(e) if e.is_timeout() => "timeout",
            Self::Transport(e) if e.is_connect() => "connect",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Rejected { .. } => "rejected",
        }
    }
}
