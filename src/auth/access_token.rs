use serde_json::Value;

use super::error::ExchangeError;

/// Field names the provider has used for the access token, most preferred first.
pub const ACCESS_TOKEN_KEYS: &[&str] = &["accessToken", "access_token", "token"];

/// Field names the provider has used for the token lifetime, most preferred first.
pub const EXPIRES_IN_KEYS: &[&str] = &["expiresIn", "expires_in", "expiry"];

pub const DEFAULT_EXPIRES_IN: u64 = 3600;

#[derive(Debug, Default, serde::Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

fn lookup<'a, T>(
    payload: &'a Value,
    keys: &[&str],
    accept: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    keys.iter()
        .filter_map(|key| payload.get(*key))
        .find_map(|value| accept(value))
}

fn as_token(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn as_lifetime(value: &Value) -> Option<u64> {
    let secs = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    secs.filter(|secs| *secs > 0)
}

/// Reconcile the provider's token payload into a single shape.
///
/// Every path that reads a provider response goes through here so that the
/// accepted field names stay in one place.
pub fn normalize(payload: &Value) -> Result<AccessTokenResponse, ExchangeError> {
    let access_token = lookup(payload, ACCESS_TOKEN_KEYS, as_token).ok_or_else(|| {
        let mut fields: Vec<String> = payload
            .as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();
        fields.sort();
        ExchangeError::MissingToken { fields }
    })?;

    let expires_in = lookup(payload, EXPIRES_IN_KEYS, as_lifetime).unwrap_or(DEFAULT_EXPIRES_IN);

    Ok(AccessTokenResponse {
        access_token,
        expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expected() -> AccessTokenResponse {
        AccessTokenResponse {
            access_token: "x".to_string(),
            expires_in: 10,
        }
    }

    #[test]
    fn all_field_spellings_normalize_alike() {
        assert_eq!(
            normalize(&json!({"access_token": "x", "expires_in": 10})).unwrap(),
            expected()
        );
        assert_eq!(
            normalize(&json!({"accessToken": "x", "expiresIn": 10})).unwrap(),
            expected()
        );
        assert_eq!(
            normalize(&json!({"token": "x", "expiry": 10})).unwrap(),
            expected()
        );
    }

    #[test]
    fn earlier_keys_win() {
        let payload = json!({
            "token": "third",
            "access_token": "second",
            "accessToken": "first",
            "expiry": 1,
            "expiresIn": 30,
        });
        let response = normalize(&payload).unwrap();
        assert_eq!(response.access_token, "first");
        assert_eq!(response.expires_in, 30);
    }

    #[test]
    fn empty_or_null_candidates_are_skipped() {
        let payload = json!({"accessToken": "", "access_token": null, "token": "x", "expiresIn": 0, "expires_in": "10"});
        assert_eq!(normalize(&payload).unwrap(), expected());
    }

    #[test]
    fn lifetime_defaults_to_an_hour() {
        let response = normalize(&json!({"access_token": "x"})).unwrap();
        assert_eq!(response.expires_in, DEFAULT_EXPIRES_IN);

        let response = normalize(&json!({"access_token": "x", "expires_in": "soon"})).unwrap();
        assert_eq!(response.expires_in, DEFAULT_EXPIRES_IN);
    }

    #[test]
    fn unrecognized_payload_reports_fields() {
        match normalize(&json!({"foo": "bar", "baz": 1})) {
            Err(ExchangeError::MissingToken { fields }) => {
                assert_eq!(fields, vec!["baz".to_string(), "foo".to_string()])
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_object_payload_has_no_fields() {
        match normalize(&json!("tok")) {
            Err(ExchangeError::MissingToken { fields }) => assert!(fields.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn response_serializes_in_camel_case() {
        let body = serde_json::to_value(expected()).unwrap();
        assert_eq!(body, json!({"accessToken": "x", "expiresIn": 10}));
    }
}
