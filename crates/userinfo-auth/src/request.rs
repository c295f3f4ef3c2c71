use indexmap::IndexSet;
use serde::Serialize;

use crate::{
    client::RawUserInfo,
    error::{Error, Result},
};

const OAUTH2_REQUEST_KEY: &str = "oauth2Request";
const CLIENT_ID_KEY: &str = "clientId";
const SCOPE_KEY: &str = "scope";

/// Client id and scopes of the request that originally issued the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuth2Request {
    client_id: String,
    scopes: IndexSet<String>,
}

impl OAuth2Request {
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn scopes(&self) -> &IndexSet<String> {
        &self.scopes
    }

    pub(crate) fn into_parts(self) -> (String, IndexSet<String>) {
        (self.client_id, self.scopes)
    }
}

/// Read the authorization context from the `oauth2Request` object of a user-info payload.
///
/// A missing `clientId` yields an empty client id, a missing `scope` an empty
/// scope set. Duplicate scopes are collapsed, keeping first-occurrence order.
///
/// # Errors
/// - [`Error::MalformedUserInfo`] if `oauth2Request` is missing or not an object,
///   `clientId` is not a string, or `scope` is not an array of strings.
pub fn extract_request_context(user_info: &RawUserInfo) -> Result<OAuth2Request> {
    let request = user_info
        .get(OAUTH2_REQUEST_KEY)
        .ok_or_else(|| Error::malformed(format!("missing `{OAUTH2_REQUEST_KEY}`")))?
        .as_object()
        .ok_or_else(|| Error::malformed(format!("`{OAUTH2_REQUEST_KEY}` is not an object")))?;

    let client_id = match request.get(CLIENT_ID_KEY) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(client_id)) => client_id.clone(),
        Some(_) => {
            return Err(Error::malformed(format!(
                "`{OAUTH2_REQUEST_KEY}.{CLIENT_ID_KEY}` is not a string"
            )));
        }
    };

    let scopes = match request.get(SCOPE_KEY) {
        None | Some(serde_json::Value::Null) => IndexSet::new(),
        Some(serde_json::Value::Array(scopes)) => parse_scopes(scopes)?,
        Some(_) => {
            return Err(Error::malformed(format!(
                "`{OAUTH2_REQUEST_KEY}.{SCOPE_KEY}` is not an array"
            )));
        }
    };

    Ok(OAuth2Request { client_id, scopes })
}

fn parse_scopes(scopes: &[serde_json::Value]) -> Result<IndexSet<String>> {
    scopes
        .iter()
        .map(|scope| {
            scope.as_str().map(ToString::to_string).ok_or_else(|| {
                Error::malformed(format!(
                    "`{OAUTH2_REQUEST_KEY}.{SCOPE_KEY}` contains a non-string entry: {scope}"
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user_info(value: serde_json::Value) -> RawUserInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_duplicate_scopes_collapse() {
        let payload = user_info(serde_json::json!({
            "oauth2Request": {"clientId": "c1", "scope": ["a", "b", "a"]}
        }));
        let request = extract_request_context(&payload).unwrap();

        assert_eq!(request.client_id(), "c1");
        assert_eq!(
            request.scopes().iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_missing_scope_is_empty() {
        let payload = user_info(serde_json::json!({"oauth2Request": {"clientId": "c1"}}));
        let request = extract_request_context(&payload).unwrap();

        assert_eq!(request.client_id(), "c1");
        assert!(request.scopes().is_empty());
    }

    #[test]
    fn test_missing_client_id_is_empty() {
        let payload = user_info(serde_json::json!({"oauth2Request": {"scope": ["ui"]}}));
        let request = extract_request_context(&payload).unwrap();

        assert_eq!(request.client_id(), "");
        assert!(request.scopes().contains("ui"));
    }

    #[test]
    fn test_missing_oauth2_request() {
        let payload = user_info(serde_json::json!({"name": "alice"}));
        let error = extract_request_context(&payload).unwrap_err();
        assert!(matches!(error, Error::MalformedUserInfo { .. }));
    }

    #[test]
    fn test_oauth2_request_not_an_object() {
        let payload = user_info(serde_json::json!({"oauth2Request": "web-client"}));
        let error = extract_request_context(&payload).unwrap_err();
        assert!(matches!(error, Error::MalformedUserInfo { .. }));
    }

    #[test]
    fn test_invalid_field_types() {
        for request in [
            serde_json::json!({"clientId": 7}),
            serde_json::json!({"clientId": "c1", "scope": "read write"}),
            serde_json::json!({"clientId": "c1", "scope": ["read", 1]}),
        ] {
            let payload = user_info(serde_json::json!({ "oauth2Request": request.clone() }));
            let error = extract_request_context(&payload).unwrap_err();
            assert!(
                matches!(error, Error::MalformedUserInfo { .. }),
                "unexpected result for {request}"
            );
        }
    }
}
