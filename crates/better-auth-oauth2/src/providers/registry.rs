// String-keyed provider registry.
//
// Social providers are registered once at startup and looked up by id when a
// sign-in, callback, or refresh request names one.

use std::collections::HashMap;
use std::sync::Arc;

use better_auth_core::error::{ApiError, ErrorCode};

use crate::provider::OAuthProvider;

/// Registered social providers, keyed by `OAuthProvider::id`.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn OAuthProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its id, returning any provider it replaced.
    pub fn register<P>(&mut self, provider: P) -> Option<Arc<dyn OAuthProvider>>
    where
        P: OAuthProvider + 'static,
    {
        self.register_arc(Arc::new(provider))
    }

    pub fn register_arc(
        &mut self,
        provider: Arc<dyn OAuthProvider>,
    ) -> Option<Arc<dyn OAuthProvider>> {
        let id = provider.id().to_string();
        tracing::debug!(provider = %id, "registering social provider");
        self.providers.insert(id, provider)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn OAuthProvider>> {
        self.providers.get(id).cloned()
    }

    /// Like `get`, but a missing provider is a `PROVIDER_NOT_FOUND` API error.
    pub fn require(&self, id: &str) -> Result<Arc<dyn OAuthProvider>, ApiError> {
        self.get(id)
            .ok_or_else(|| ApiError::not_found(ErrorCode::ProviderNotFound))
    }

    /// Registered provider ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use better_auth_core::error::{BetterAuthError, HttpStatus};

    use super::*;
    use crate::provider::{
        AuthorizationUrlData, CodeValidationData, ProviderOptions, UserInfoResult,
    };
    use crate::tokens::OAuth2Tokens;

    #[derive(Debug)]
    struct StubProvider {
        id: &'static str,
        options: ProviderOptions,
    }

    impl StubProvider {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                options: ProviderOptions::new(format!("{id}-client")),
            }
        }
    }

    #[async_trait]
    impl OAuthProvider for StubProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            "Stub"
        }

        fn options(&self) -> &ProviderOptions {
            &self.options
        }

        fn authorization_endpoint(&self) -> &str {
            "https://stub.example.com/authorize"
        }

        fn token_endpoint(&self) -> &str {
            "https://stub.example.com/token"
        }

        async fn create_authorization_url(
            &self,
            _data: &AuthorizationUrlData,
        ) -> Result<url::Url, BetterAuthError> {
            url::Url::parse(self.authorization_endpoint())
                .map_err(|e| BetterAuthError::Other(e.to_string()))
        }

        async fn validate_authorization_code(
            &self,
            _data: &CodeValidationData,
        ) -> Result<Option<OAuth2Tokens>, BetterAuthError> {
            Ok(None)
        }

        async fn get_user_info(
            &self,
            _tokens: &OAuth2Tokens,
        ) -> Result<Option<UserInfoResult>, BetterAuthError> {
            Ok(None)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(StubProvider::new("beta")).is_none());
        assert!(registry.register(StubProvider::new("alpha")).is_none());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec!["alpha", "beta"]);
        assert_eq!(
            registry.get("alpha").unwrap().options().client_id,
            "alpha-client"
        );
        assert!(registry.get("gamma").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = ProviderRegistry::new();
        registry.register(StubProvider::new("alpha"));
        let replaced = registry.register(StubProvider::new("alpha"));
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_missing_provider() {
        let registry = ProviderRegistry::new();
        let err = registry.require("nope").unwrap_err();
        assert_eq!(err.status, HttpStatus::NotFound);
        assert_eq!(err.code, ErrorCode::ProviderNotFound);
    }

    #[tokio::test]
    async fn test_default_refresh_is_unsupported() {
        let provider = StubProvider::new("alpha");
        let err = provider.refresh_access_token("rt").await.unwrap_err();
        assert!(err.to_string().contains("does not support token refresh"));
    }
}
