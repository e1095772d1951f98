// Wild Apricot OAuth provider.
//
// Login happens on the organization's site, tokens come from the shared OAuth
// host, and the profile is the signed-in contact's record from the REST API.

use async_trait::async_trait;
use better_auth_core::error::{ApiError, BetterAuthError, ErrorCode, HttpStatus};
use better_auth_oauth2::{
    create_authorization_url, refresh_access_token, validate_authorization_code,
    AuthenticationMethod, AuthorizationUrlData, AuthorizationUrlParams, CodeExchangeParams,
    CodeValidationData, OAuth2Tokens, OAuth2UserInfo, OAuthProvider, ProviderOptions,
    RefreshTokenParams, UserInfoResult,
};
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::options::{WildApricotEndpoints, WildApricotOptions};
use crate::profile::WildApricotProfile;

pub const PROVIDER_ID: &str = "wildapricot";
pub const PROVIDER_NAME: &str = "Wild Apricot";

/// Scope granting read access to the signed-in contact's own record.
pub const DEFAULT_SCOPE: &str = "contacts_me";

const REFRESH_FAILED_MESSAGE: &str = "Failed to refresh access token";

#[derive(Debug, Clone)]
pub struct WildApricotProvider {
    options: WildApricotOptions,
    endpoints: WildApricotEndpoints,
    authorization_endpoint: String,
    token_endpoint: String,
    http: reqwest::Client,
}

impl WildApricotProvider {
    /// Build the provider against the public Wild Apricot hosts.
    pub fn new(options: WildApricotOptions) -> Result<Self, BetterAuthError> {
        let endpoints = WildApricotEndpoints::for_site(options.site_name.as_deref());
        Self::with_endpoints(options, endpoints)
    }

    /// Build the provider against explicit base URLs.
    pub fn with_endpoints(
        options: WildApricotOptions,
        endpoints: WildApricotEndpoints,
    ) -> Result<Self, BetterAuthError> {
        options.validate()?;
        Ok(Self {
            authorization_endpoint: endpoints.authorization_endpoint(),
            token_endpoint: endpoints.token_endpoint(),
            options,
            endpoints,
            http: reqwest::Client::new(),
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn wildapricot_options(&self) -> &WildApricotOptions {
        &self.options
    }

    pub fn endpoints(&self) -> &WildApricotEndpoints {
        &self.endpoints
    }

    fn client_secret(&self) -> Option<String> {
        self.options.provider.client_secret.clone()
    }

    /// Call-supplied redirect URI, else the configured one.
    fn effective_redirect_uri(&self, requested: Option<&str>) -> Result<String, ApiError> {
        requested
            .filter(|uri| !uri.is_empty())
            .or(self.options.provider.redirect_uri.as_deref())
            .map(String::from)
            .ok_or_else(|| ApiError::bad_request(ErrorCode::InvalidRedirectUrl))
    }

    /// Configured scopes, or the default scope when none are configured.
    fn scopes(&self, extra: Option<&[String]>) -> Vec<String> {
        let mut scopes = if self.options.provider.scope.is_empty() {
            self.default_scopes()
        } else {
            self.options.provider.scope.clone()
        };
        for scope in extra.unwrap_or_default() {
            if !scopes.contains(scope) {
                scopes.push(scope.clone());
            }
        }
        scopes
    }

    /// Normalize a contact record into the framework's user shape.
    ///
    /// Returns `None` when the record has no `Id`.
    pub fn map_profile(&self, profile: &WildApricotProfile) -> Option<OAuth2UserInfo> {
        let id = profile.id?;
        let status = profile.membership_status();

        let mut user = OAuth2UserInfo::new(id.to_string());
        user.name = profile.full_name();
        user.email = profile.email.clone();
        user.email_verified = true;
        user.image = None;

        let fields = &mut user.additional_fields;
        fields.insert("membershipStatus".into(), Value::String(status.to_string()));
        fields.insert(
            "membershipLevel".into(),
            profile
                .membership_level_name()
                .map_or(Value::Null, |name| Value::String(name.to_string())),
        );
        fields.insert("isActiveMember".into(), Value::Bool(status.is_active()));
        fields.insert("isAdmin".into(), Value::Bool(profile.is_admin()));

        if let Some(mapper) = &self.options.map_profile_to_user {
            user.apply_overrides(mapper(profile));
        }

        Some(user)
    }

    /// GET the signed-in contact. Any failure is `None`.
    async fn fetch_contact(&self, access_token: &str) -> Option<Value> {
        let url = self.endpoints.contact_me_endpoint(&self.options.account_id);
        tracing::debug!(provider = PROVIDER_ID, %url, "fetching contact profile");

        let response = match self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = PROVIDER_ID, error = %e, "contact profile request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(provider = PROVIDER_ID, %status, "contact profile request rejected");
            return None;
        }

        match response.json::<Value>().await {
            Ok(Value::Null) => None,
            Ok(Value::Object(map)) if map.is_empty() => None,
            Ok(data) => Some(data),
            Err(e) => {
                tracing::debug!(provider = PROVIDER_ID, error = %e, "contact profile body unreadable");
                None
            }
        }
    }
}

#[async_trait]
impl OAuthProvider for WildApricotProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn options(&self) -> &ProviderOptions {
        &self.options.provider
    }

    fn authorization_endpoint(&self) -> &str {
        &self.authorization_endpoint
    }

    fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    fn authentication_method(&self) -> AuthenticationMethod {
        AuthenticationMethod::Basic
    }

    fn default_scopes(&self) -> Vec<String> {
        vec![DEFAULT_SCOPE.to_string()]
    }

    async fn create_authorization_url(
        &self,
        data: &AuthorizationUrlData,
    ) -> Result<url::Url, BetterAuthError> {
        let redirect_uri = self.effective_redirect_uri(data.redirect_uri.as_deref())?;

        // Wild Apricot has no PKCE support, so the verifier is not forwarded.
        create_authorization_url(AuthorizationUrlParams {
            authorization_endpoint: self.authorization_endpoint.clone(),
            redirect_uri,
            client_id: self.options.provider.client_id.clone(),
            state: data.state.clone(),
            code_verifier: None,
            scopes: Some(self.scopes(data.scopes.as_deref())),
            ..Default::default()
        })
        .map_err(|e| BetterAuthError::Other(format!("Failed to build authorization URL: {e}")))
    }

    async fn validate_authorization_code(
        &self,
        data: &CodeValidationData,
    ) -> Result<Option<OAuth2Tokens>, BetterAuthError> {
        let redirect_uri = self.effective_redirect_uri(data.redirect_uri.as_deref())?;

        let tokens = validate_authorization_code(
            &self.http,
            CodeExchangeParams {
                code: data.code.clone(),
                redirect_uri,
                token_endpoint: self.token_endpoint.clone(),
                client_id: self.options.provider.client_id.clone(),
                client_secret: self.client_secret(),
                code_verifier: data.code_verifier.clone(),
                authentication: AuthenticationMethod::Basic,
                headers: Vec::new(),
                additional_params: Vec::new(),
            },
        )
        .await?;

        Ok(Some(tokens))
    }

    async fn get_user_info(
        &self,
        tokens: &OAuth2Tokens,
    ) -> Result<Option<UserInfoResult>, BetterAuthError> {
        let Some(access_token) = tokens.access_token.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let Some(data) = self.fetch_contact(access_token).await else {
            return Ok(None);
        };

        let profile: WildApricotProfile = match serde_json::from_value(data.clone()) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!(provider = PROVIDER_ID, error = %e, "contact profile has unexpected shape");
                return Ok(None);
            }
        };

        Ok(self
            .map_profile(&profile)
            .map(|user| UserInfoResult { user, data }))
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<OAuth2Tokens, BetterAuthError> {
        let refresh_failed = || {
            ApiError::with_message(
                HttpStatus::BadRequest,
                ErrorCode::CouldNotRefreshAccessToken,
                REFRESH_FAILED_MESSAGE,
            )
        };

        let tokens = refresh_access_token(
            &self.http,
            RefreshTokenParams {
                refresh_token: refresh_token.to_string(),
                token_endpoint: self.token_endpoint.clone(),
                client_id: self.options.provider.client_id.clone(),
                client_secret: self.client_secret(),
                authentication: AuthenticationMethod::Basic,
                extra_params: Vec::new(),
            },
        )
        .await
        .map_err(|e| {
            // Upstream detail stays in the logs only.
            tracing::debug!(provider = PROVIDER_ID, error = %e, "token refresh failed");
            refresh_failed()
        })?;

        if tokens.access_token.as_deref().map_or(true, str::is_empty) {
            tracing::debug!(provider = PROVIDER_ID, "token refresh returned no access token");
            return Err(refresh_failed().into());
        }

        Ok(tokens)
    }
}
