// Wild Apricot provider configuration.

use std::fmt;
use std::sync::Arc;

use better_auth_core::env;
use better_auth_core::error::BetterAuthError;
use better_auth_oauth2::ProviderOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::profile::WildApricotProfile;

/// Maps a raw profile to extra user fields. Returned keys override the
/// provider's defaults.
pub type ProfileMapper = Arc<dyn Fn(&WildApricotProfile) -> Map<String, Value> + Send + Sync>;

/// Public host used when no site name is configured.
pub const DEFAULT_SITE_URL: &str = "https://wildapricot.org";
pub const OAUTH_URL: &str = "https://oauth.wildapricot.org";
pub const API_URL: &str = "https://api.wildapricot.org";

/// Options for the Wild Apricot provider.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildApricotOptions {
    #[serde(flatten)]
    pub provider: ProviderOptions,

    /// Organization site name; the login page is served from
    /// `https://{site_name}.wildapricot.org`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    /// Account whose contact records are read.
    pub account_id: String,

    #[serde(skip)]
    pub map_profile_to_user: Option<ProfileMapper>,
}

impl fmt::Debug for WildApricotOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WildApricotOptions")
            .field("client_id", &self.provider.client_id)
            .field("site_name", &self.site_name)
            .field("account_id", &self.account_id)
            .field("redirect_uri", &self.provider.redirect_uri)
            .field("scope", &self.provider.scope)
            .field("map_profile_to_user", &self.map_profile_to_user.is_some())
            .finish_non_exhaustive()
    }
}

impl WildApricotOptions {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            provider: ProviderOptions::new(client_id).with_secret(client_secret),
            site_name: None,
            account_id: account_id.into(),
            map_profile_to_user: None,
        }
    }

    /// Load options from `WILDAPRICOT_*` environment variables.
    pub fn from_env() -> Result<Self, BetterAuthError> {
        Self::from_lookup(env::env_var)
    }

    /// Load options through a variable lookup.
    ///
    /// `WILDAPRICOT_CLIENT_ID`, `WILDAPRICOT_CLIENT_SECRET` and
    /// `WILDAPRICOT_ACCOUNT_ID` are required. `WILDAPRICOT_SITE_NAME`,
    /// `WILDAPRICOT_REDIRECT_URI` and `WILDAPRICOT_SCOPES` (space separated)
    /// are optional.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BetterAuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BetterAuthError::Config(format!("{name} is not set")))
        };

        let mut options = Self::new(
            required("WILDAPRICOT_CLIENT_ID")?,
            required("WILDAPRICOT_CLIENT_SECRET")?,
            required("WILDAPRICOT_ACCOUNT_ID")?,
        );
        options.site_name = lookup("WILDAPRICOT_SITE_NAME").filter(|v| !v.is_empty());
        options.provider.redirect_uri = lookup("WILDAPRICOT_REDIRECT_URI").filter(|v| !v.is_empty());
        if let Some(scopes) = lookup("WILDAPRICOT_SCOPES") {
            options.provider.scope = scopes.split_whitespace().map(String::from).collect();
        }
        Ok(options)
    }

    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.provider.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.provider = self.provider.with_scopes(scopes);
        self
    }

    pub fn with_profile_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&WildApricotProfile) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.map_profile_to_user = Some(Arc::new(mapper));
        self
    }

    /// Reject options the provider cannot work with.
    pub(crate) fn validate(&self) -> Result<(), BetterAuthError> {
        if self.provider.client_id.trim().is_empty() {
            return Err(BetterAuthError::Config(
                "Wild Apricot client id is required".into(),
            ));
        }
        if self
            .provider
            .client_secret
            .as_deref()
            .map_or(true, |s| s.is_empty())
        {
            return Err(BetterAuthError::Config(
                "Wild Apricot client secret is required".into(),
            ));
        }
        if self.account_id.trim().is_empty() {
            return Err(BetterAuthError::Config(
                "Wild Apricot account id is required".into(),
            ));
        }
        Ok(())
    }
}

/// Base URLs the provider talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildApricotEndpoints {
    /// Organization site hosting the OAuth login page.
    pub site_url: String,
    /// OAuth token host.
    pub oauth_url: String,
    /// REST API host.
    pub api_url: String,
}

impl WildApricotEndpoints {
    pub fn for_site(site_name: Option<&str>) -> Self {
        let site_url = match site_name.filter(|s| !s.is_empty()) {
            Some(site) => format!("https://{site}.wildapricot.org"),
            None => DEFAULT_SITE_URL.to_string(),
        };
        Self {
            site_url,
            oauth_url: OAUTH_URL.to_string(),
            api_url: API_URL.to_string(),
        }
    }

    /// Point every endpoint at one base URL (proxies, test servers).
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            site_url: base.clone(),
            oauth_url: base.clone(),
            api_url: base,
        }
    }

    pub fn authorization_endpoint(&self) -> String {
        format!("{}/sys/login/OAuthLogin", self.site_url)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/auth/token", self.oauth_url)
    }

    pub fn contact_me_endpoint(&self, account_id: &str) -> String {
        format!("{}/v2.1/accounts/{account_id}/contacts/me", self.api_url)
    }
}
