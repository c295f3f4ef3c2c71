//! Strategies mapping a user-info payload to granted authorities.

use indexmap::IndexSet;

use crate::client::RawUserInfo;

/// Authority granted to every authenticated principal by default.
pub const ROLE_USER: &str = "ROLE_USER";

/// Derive the authorities granted to a principal from its user-info payload.
///
/// Closures of type `Fn(&RawUserInfo) -> IndexSet<String>` implement this trait.
pub trait AuthoritiesExtractor: Send + Sync {
    fn extract_authorities(&self, user_info: &RawUserInfo) -> IndexSet<String>;
}

impl<F> AuthoritiesExtractor for F
where
    F: Fn(&RawUserInfo) -> IndexSet<String> + Send + Sync,
{
    fn extract_authorities(&self, user_info: &RawUserInfo) -> IndexSet<String> {
        self(user_info)
    }
}

/// Grants the same fixed authorities regardless of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAuthoritiesExtractor {
    authorities: IndexSet<String>,
}

impl FixedAuthoritiesExtractor {
    #[must_use]
    pub fn new<I, S>(authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for FixedAuthoritiesExtractor {
    fn default() -> Self {
        Self::new([ROLE_USER])
    }
}

impl AuthoritiesExtractor for FixedAuthoritiesExtractor {
    fn extract_authorities(&self, _user_info: &RawUserInfo) -> IndexSet<String> {
        self.authorities.clone()
    }
}

/// Reads authorities from a claim of the payload.
///
/// The claim may hold a comma-separated string, an array of strings, or an
/// array of `{"authority": "..."}` objects. Falls back to the default
/// authorities if the claim is missing or yields nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimAuthoritiesExtractor {
    claim: String,
    fallback: FixedAuthoritiesExtractor,
}

impl ClaimAuthoritiesExtractor {
    pub const DEFAULT_CLAIM: &'static str = "authorities";

    #[must_use]
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            fallback: FixedAuthoritiesExtractor::default(),
        }
    }

    /// Authorities granted when the claim is missing or empty.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FixedAuthoritiesExtractor) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for ClaimAuthoritiesExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CLAIM)
    }
}

impl AuthoritiesExtractor for ClaimAuthoritiesExtractor {
    fn extract_authorities(&self, user_info: &RawUserInfo) -> IndexSet<String> {
        let authorities: IndexSet<String> = match user_info.get(&self.claim) {
            Some(serde_json::Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToString::to_string)
                .collect(),
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| {
                    v.as_str()
                        .or_else(|| v.get("authority").and_then(serde_json::Value::as_str))
                })
                .map(ToString::to_string)
                .collect(),
            _ => IndexSet::new(),
        };

        if authorities.is_empty() {
            self.fallback.extract_authorities(user_info)
        } else {
            authorities
        }
    }
}
