// OAuth2 token and user types.
//
// OAuth2Tokens: token endpoint response, normalized.
// OAuth2UserInfo: normalized user information from a provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard OAuth2 token response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Tokens {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Raw token response, provider-specific fields included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

/// Raw token response from the provider (snake_case wire format).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token_expires_in: Option<i64>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
}

/// `now + secs`, or `None` when the lifetime is missing, not positive, or
/// past the representable date range.
fn expiry_from(now: DateTime<Utc>, secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.filter(|s| *s > 0)
        .and_then(chrono::Duration::try_seconds)
        .and_then(|d| now.checked_add_signed(d))
}

impl OAuth2Tokens {
    /// Parse a raw provider token response.
    ///
    /// Expiry timestamps are computed relative to the moment of the call.
    /// A zero `expires_in` means no expiry is known.
    pub fn from_raw(data: &Value) -> Self {
        let raw: RawTokenResponse = serde_json::from_value(data.clone()).unwrap_or_default();

        let now = Utc::now();
        let scopes = raw
            .scope
            .map(|s| s.split(' ').map(String::from).collect());

        Self {
            token_type: raw.token_type,
            access_token: raw.access_token,
            refresh_token: raw.refresh_token,
            access_token_expires_at: expiry_from(now, raw.expires_in),
            refresh_token_expires_at: expiry_from(now, raw.refresh_token_expires_in),
            scopes,
            id_token: raw.id_token,
            raw: Some(data.clone()),
        }
    }

    /// Build a token set holding only an access token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Default::default()
        }
    }
}

/// Normalized user information returned by a provider.
///
/// Provider-specific fields live in `additional_fields` and are flattened
/// next to the standard ones when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2UserInfo {
    /// Provider-specific user ID (numeric IDs are converted to strings).
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub email_verified: bool,
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl OAuth2UserInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            image: None,
            email_verified: false,
            additional_fields: Map::new(),
        }
    }

    /// Look up a provider-specific field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.additional_fields.get(key)
    }

    /// Merge user-supplied fields over the current values. Overrides win.
    ///
    /// Standard keys (`id`, `name`, `email`, `image`, `emailVerified`) update
    /// the typed fields. A `null` clears an optional field. Values of the wrong
    /// type for a standard key, and an empty `id`, are ignored.
    pub fn apply_overrides(&mut self, overrides: Map<String, Value>) {
        for (key, value) in overrides {
            match key.as_str() {
                "id" => match value {
                    Value::String(s) if !s.is_empty() => self.id = s,
                    Value::Number(n) => self.id = n.to_string(),
                    other => tracing::debug!(value = %other, "ignoring invalid id override"),
                },
                "name" => set_optional_string(&mut self.name, &key, value),
                "email" => set_optional_string(&mut self.email, &key, value),
                "image" => set_optional_string(&mut self.image, &key, value),
                "emailVerified" => match value {
                    Value::Bool(b) => self.email_verified = b,
                    other => {
                        tracing::debug!(value = %other, "ignoring invalid emailVerified override")
                    }
                },
                _ => {
                    self.additional_fields.insert(key, value);
                }
            }
        }
    }
}

fn set_optional_string(target: &mut Option<String>, key: &str, value: Value) {
    match value {
        Value::String(s) => *target = Some(s),
        Value::Null => *target = None,
        other => tracing::debug!(field = key, value = %other, "ignoring invalid override"),
    }
}
