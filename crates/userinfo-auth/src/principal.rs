use crate::client::RawUserInfo;

/// Keys searched for the principal, highest priority first.
pub const PRINCIPAL_KEYS: [&str; 7] = [
    "user", "username", "userid", "user_id", "login", "id", "name",
];

/// Principal returned when the payload contains none of the [`PRINCIPAL_KEYS`].
pub const UNKNOWN_PRINCIPAL: &str = "unknown";

/// Extract the principal from a user-info payload.
///
/// The value of the first of [`PRINCIPAL_KEYS`] present in the payload wins, no
/// matter where lower-priority keys appear. A present key holding `null` still
/// ends the scan and yields [`UNKNOWN_PRINCIPAL`]. Non-string values such as
/// numeric ids are rendered as JSON text.
#[must_use]
pub fn extract_principal(user_info: &RawUserInfo) -> String {
    match PRINCIPAL_KEYS.iter().find_map(|key| user_info.get(*key)) {
        None | Some(serde_json::Value::Null) => UNKNOWN_PRINCIPAL.to_string(),
        Some(value) => value_as_string(value),
    }
}

pub(crate) fn value_as_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
