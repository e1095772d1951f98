// Exchange a refresh token for a new access token.

use better_auth_core::error::BetterAuthError;

use crate::provider::AuthenticationMethod;
use crate::token_request::{send_token_request, ClientAuth};
use crate::tokens::OAuth2Tokens;

/// Parameters for refreshing an access token.
#[derive(Debug, Clone)]
pub struct RefreshTokenParams {
    /// The refresh token.
    pub refresh_token: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: Option<String>,
    /// Authentication method (Basic or POST).
    pub authentication: AuthenticationMethod,
    /// Extra body parameters.
    pub extra_params: Vec<(String, String)>,
}

/// Refresh an OAuth2 access token.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    params: RefreshTokenParams,
) -> Result<OAuth2Tokens, BetterAuthError> {
    let mut form = vec![
        ("grant_type".to_string(), "refresh_token".to_string()),
        ("refresh_token".to_string(), params.refresh_token),
    ];
    form.extend(params.extra_params);

    send_token_request(
        client,
        &params.token_endpoint,
        form,
        ClientAuth {
            client_id: &params.client_id,
            client_secret: params.client_secret.as_deref(),
            method: params.authentication,
        },
        &[],
    )
    .await
}
