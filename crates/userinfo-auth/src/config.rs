//! Configuration of the [`UserInfoTokenResolver`](crate::UserInfoTokenResolver).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Token type label attached to outbound credentials unless configured otherwise.
pub const BEARER_TYPE: &str = "Bearer";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for talking to the user-info endpoint.
///
/// Can be deserialized from any serde format. Durations use the humantime
/// format, e.g. `"750ms"` or `"10s"`:
///
/// ```
/// # use userinfo_auth::ResolverConfig;
/// let config: ResolverConfig = serde_json::from_value(serde_json::json!({
///     "user_info_uri": "http://auth-service:5000/uaa/users/current",
///     "client_id": "statistics-service",
///     "timeout": "3s"
/// }))
/// .unwrap();
/// assert_eq!(config.token_type, "Bearer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct ResolverConfig {
    /// URL of the user-info endpoint tokens are exchanged at.
    pub user_info_uri: url::Url,
    /// Client id of this service, used when attaching outbound credentials.
    #[builder(setter(into))]
    pub client_id: String,
    /// Token type label of the attached credential.
    #[serde(default = "default_token_type")]
    #[builder(default = default_token_type(), setter(into))]
    pub token_type: String,
    /// Total timeout of one user-info request.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Timeout for establishing the connection to the endpoint.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,
    /// `User-Agent` sent with user-info requests.
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub user_agent: Option<String>,
}

fn default_token_type() -> String {
    BEARER_TYPE.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}
