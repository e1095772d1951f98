// OAuthProvider trait and ProviderOptions.
//
// The trait that every social provider implements. ProviderOptions captures
// the per-provider configuration shared by all of them.

use async_trait::async_trait;
use better_auth_core::error::BetterAuthError;
use serde::{Deserialize, Serialize};

use crate::tokens::{OAuth2Tokens, OAuth2UserInfo};

/// Configuration options for an OAuth provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    /// OAuth client ID.
    pub client_id: String,

    /// OAuth client secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Requested scopes. Empty means the provider defaults.
    #[serde(default)]
    pub scope: Vec<String>,

    /// Custom redirect URI.
    #[serde(
        default,
        rename = "redirectURI",
        alias = "redirectUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub redirect_uri: Option<String>,

    /// Disable implicit sign-up (require an explicit sign-up request).
    #[serde(default)]
    pub disable_implicit_sign_up: bool,

    /// Disable sign-up entirely for this provider.
    #[serde(default)]
    pub disable_sign_up: bool,

    /// Override user info on each sign-in (default: false).
    #[serde(default)]
    pub override_user_info_on_sign_in: bool,
}

impl ProviderOptions {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scope = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }
}

/// Data passed to `create_authorization_url`.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationUrlData {
    pub state: String,
    /// PKCE verifier; providers without PKCE support ignore it.
    pub code_verifier: Option<String>,
    /// Extra scopes requested for this sign-in only.
    pub scopes: Option<Vec<String>>,
    /// Callback URI; falls back to the configured one when absent.
    pub redirect_uri: Option<String>,
}

/// Data passed to `validate_authorization_code`.
#[derive(Debug, Clone, Default)]
pub struct CodeValidationData {
    pub code: String,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
}

/// Result of `get_user_info`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfoResult {
    pub user: OAuth2UserInfo,
    /// Provider-specific raw profile, untouched.
    pub data: serde_json::Value,
}

/// Authentication method for token requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthenticationMethod {
    /// Send credentials as HTTP Basic auth header.
    Basic,
    /// Send credentials in POST body (default).
    #[default]
    Post,
}

/// The core OAuthProvider trait.
///
/// The framework stores providers as `Arc<dyn OAuthProvider>` keyed by `id()`
/// and dispatches every social sign-in step through it.
#[async_trait]
pub trait OAuthProvider: Send + Sync + std::fmt::Debug {
    /// Unique provider identifier (e.g., "wildapricot").
    fn id(&self) -> &str;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Provider options (client ID, secret, scopes, etc.).
    fn options(&self) -> &ProviderOptions;

    /// Authorization endpoint URL.
    fn authorization_endpoint(&self) -> &str;

    /// Token endpoint URL.
    fn token_endpoint(&self) -> &str;

    /// Authentication method for token requests.
    fn authentication_method(&self) -> AuthenticationMethod {
        AuthenticationMethod::Post
    }

    /// Default scopes for this provider.
    fn default_scopes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Build the authorization URL.
    async fn create_authorization_url(
        &self,
        data: &AuthorizationUrlData,
    ) -> Result<url::Url, BetterAuthError>;

    /// Exchange an authorization code for tokens.
    async fn validate_authorization_code(
        &self,
        data: &CodeValidationData,
    ) -> Result<Option<OAuth2Tokens>, BetterAuthError>;

    /// Fetch user info from the provider. `Ok(None)` means no user.
    async fn get_user_info(
        &self,
        tokens: &OAuth2Tokens,
    ) -> Result<Option<UserInfoResult>, BetterAuthError>;

    /// Refresh an access token (not all providers support this).
    async fn refresh_access_token(
        &self,
        _refresh_token: &str,
    ) -> Result<OAuth2Tokens, BetterAuthError> {
        Err(BetterAuthError::Other(format!(
            "Provider '{}' does not support token refresh",
            self.id()
        )))
    }

    /// Whether this provider disables implicit sign-up.
    fn disable_implicit_sign_up(&self) -> bool {
        self.options().disable_implicit_sign_up
    }

    /// Whether this provider disables sign-up entirely.
    fn disable_sign_up(&self) -> bool {
        self.options().disable_sign_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_options_deserialize() {
        let options: ProviderOptions = serde_json::from_value(serde_json::json!({
            "clientId": "id",
            "clientSecret": "secret",
            "redirectURI": "https://app.example.com/cb",
            "scope": ["a", "b"],
            "disableSignUp": true
        }))
        .unwrap();

        assert_eq!(options.client_id, "id");
        assert_eq!(options.client_secret.as_deref(), Some("secret"));
        assert_eq!(options.redirect_uri.as_deref(), Some("https://app.example.com/cb"));
        assert_eq!(options.scope, vec!["a", "b"]);
        assert!(options.disable_sign_up);
        assert!(!options.disable_implicit_sign_up);
    }

    #[test]
    fn test_provider_options_builders() {
        let options = ProviderOptions::new("id")
            .with_secret("secret")
            .with_scopes(&["x"])
            .with_redirect_uri("https://cb");
        assert_eq!(options.client_secret.as_deref(), Some("secret"));
        assert_eq!(options.scope, vec!["x"]);
        assert_eq!(options.redirect_uri.as_deref(), Some("https://cb"));
    }
}
