// Token endpoint POST shared by the code exchange and refresh grants.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use better_auth_core::error::BetterAuthError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::provider::AuthenticationMethod;
use crate::tokens::OAuth2Tokens;

/// Client credentials sent with a token request.
#[derive(Debug, Clone)]
pub(crate) struct ClientAuth<'a> {
    pub client_id: &'a str,
    pub client_secret: Option<&'a str>,
    pub method: AuthenticationMethod,
}

/// `Basic base64(client_id:client_secret)` per RFC 7617.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}").as_bytes());
    format!("Basic {encoded}")
}

/// POST a form to a token endpoint and parse the response.
///
/// Fails on transport errors, non-success statuses, unparseable bodies and
/// bodies carrying an OAuth2 `error` field.
pub(crate) async fn send_token_request(
    client: &reqwest::Client,
    token_endpoint: &str,
    mut form: Vec<(String, String)>,
    auth: ClientAuth<'_>,
    extra_headers: &[(String, String)],
) -> Result<OAuth2Tokens, BetterAuthError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (key, value) in extra_headers {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, val);
        }
    }

    match auth.method {
        AuthenticationMethod::Basic => {
            let value = basic_auth_header(auth.client_id, auth.client_secret.unwrap_or(""));
            let value = HeaderValue::from_str(&value).map_err(|e| {
                BetterAuthError::Other(format!("Invalid client credentials header: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        AuthenticationMethod::Post => {
            form.push(("client_id".to_string(), auth.client_id.to_string()));
            if let Some(secret) = auth.client_secret {
                form.push(("client_secret".to_string(), secret.to_string()));
            }
        }
    }

    tracing::debug!(endpoint = token_endpoint, "sending token request");

    let response = client
        .post(token_endpoint)
        .headers(headers)
        .form(&form)
        .send()
        .await
        .map_err(|e| BetterAuthError::Other(format!("Token endpoint request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(BetterAuthError::Other(format!(
            "Token endpoint returned {status}: {body}"
        )));
    }

    let data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| BetterAuthError::Other(format!("Failed to parse token response: {e}")))?;

    if let Some(error) = data.get("error") {
        return Err(BetterAuthError::Other(format!(
            "Token endpoint returned error: {error}"
        )));
    }

    Ok(OAuth2Tokens::from_raw(&data))
}
