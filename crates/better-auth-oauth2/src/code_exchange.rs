// Authorization code exchange at the provider's token endpoint.
// Supports both Basic and POST client authentication.

use better_auth_core::error::BetterAuthError;

use crate::provider::AuthenticationMethod;
use crate::token_request::{send_token_request, ClientAuth};
use crate::tokens::OAuth2Tokens;

/// Parameters for exchanging an authorization code.
#[derive(Debug, Clone)]
pub struct CodeExchangeParams {
    /// The authorization code from the callback.
    pub code: String,
    /// The redirect URI (must match the one used in the auth request).
    pub redirect_uri: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: Option<String>,
    /// PKCE code verifier.
    pub code_verifier: Option<String>,
    /// Authentication method (Basic or POST).
    pub authentication: AuthenticationMethod,
    /// Additional request headers.
    pub headers: Vec<(String, String)>,
    /// Additional body parameters. Never replace the standard ones.
    pub additional_params: Vec<(String, String)>,
}

/// Exchange an authorization code for OAuth2 tokens.
pub async fn validate_authorization_code(
    client: &reqwest::Client,
    params: CodeExchangeParams,
) -> Result<OAuth2Tokens, BetterAuthError> {
    let mut form = vec![
        ("grant_type".to_string(), "authorization_code".to_string()),
        ("code".to_string(), params.code),
        ("redirect_uri".to_string(), params.redirect_uri),
    ];

    if let Some(verifier) = params.code_verifier {
        form.push(("code_verifier".to_string(), verifier));
    }

    for (key, value) in params.additional_params {
        if !form.iter().any(|(k, _)| *k == key) {
            form.push((key, value));
        }
    }

    send_token_request(
        client,
        &params.token_endpoint,
        form,
        ClientAuth {
            client_id: &params.client_id,
            client_secret: params.client_secret.as_deref(),
            method: params.authentication,
        },
        &params.headers,
    )
    .await
}
