// Authorization URL builder.
//
// Builds the OAuth2 authorization URL with state, scopes, optional PKCE and
// provider-specific query parameters.

use crate::pkce::generate_code_challenge;

/// Parameters for building an authorization URL.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationUrlParams {
    /// Authorization endpoint URL.
    pub authorization_endpoint: String,
    /// Redirect URI for the callback.
    pub redirect_uri: String,
    /// OAuth client ID.
    pub client_id: String,
    /// CSRF state parameter.
    pub state: String,
    /// PKCE code verifier (if provided, the S256 challenge is added).
    pub code_verifier: Option<String>,
    /// Requested scopes, in order.
    pub scopes: Option<Vec<String>>,
    /// Join character for scopes (default: " ").
    pub scope_joiner: Option<String>,
    /// Response type (default: "code").
    pub response_type: Option<String>,
    /// OAuth prompt parameter.
    pub prompt: Option<String>,
    /// Additional query parameters, appended in order.
    pub additional_params: Vec<(String, String)>,
}

/// Build an OAuth2 authorization URL.
pub fn create_authorization_url(params: AuthorizationUrlParams) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(&params.authorization_endpoint)?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", params.response_type.as_deref().unwrap_or("code"))
            .append_pair("client_id", &params.client_id)
            .append_pair("state", &params.state);

        if let Some(scopes) = &params.scopes {
            let joiner = params.scope_joiner.as_deref().unwrap_or(" ");
            query.append_pair("scope", &scopes.join(joiner));
        }

        query.append_pair("redirect_uri", &params.redirect_uri);

        if let Some(p) = &params.prompt {
            query.append_pair("prompt", p);
        }

        if let Some(verifier) = &params.code_verifier {
            let challenge = generate_code_challenge(verifier);
            query
                .append_pair("code_challenge_method", "S256")
                .append_pair("code_challenge", &challenge);
        }

        for (key, value) in &params.additional_params {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(url: &url::Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_basic_authorization_url() {
        let url = create_authorization_url(AuthorizationUrlParams {
            authorization_endpoint: "https://accounts.example.com/o/oauth2/auth".to_string(),
            redirect_uri: "http://localhost:3000/api/auth/callback/example".to_string(),
            client_id: "abc123".to_string(),
            state: "random-state".to_string(),
            code_verifier: Some("test-verifier".to_string()),
            scopes: Some(vec!["openid".to_string(), "email".to_string()]),
            ..Default::default()
        })
        .unwrap();

        let url_str = url.to_string();
        assert!(url_str.contains("response_type=code"));
        assert!(url_str.contains("client_id=abc123"));
        assert!(url_str.contains("state=random-state"));
        assert!(url_str.contains("scope=openid+email"));
        assert!(url_str.contains("code_challenge_method=S256"));
        assert_eq!(
            query(&url, "redirect_uri").as_deref(),
            Some("http://localhost:3000/api/auth/callback/example")
        );
    }

    #[test]
    fn test_without_verifier_or_scopes() {
        let url = create_authorization_url(AuthorizationUrlParams {
            authorization_endpoint: "https://example.com/authorize".to_string(),
            redirect_uri: "https://app.example.com/cb".to_string(),
            client_id: "id".to_string(),
            state: "s".to_string(),
            additional_params: vec![("audience".to_string(), "api".to_string())],
            ..Default::default()
        })
        .unwrap();

        assert!(query(&url, "code_challenge").is_none());
        assert!(query(&url, "scope").is_none());
        assert_eq!(query(&url, "audience").as_deref(), Some("api"));
    }

    #[test]
    fn test_custom_scope_joiner() {
        let url = create_authorization_url(AuthorizationUrlParams {
            authorization_endpoint: "https://example.com/authorize".to_string(),
            redirect_uri: "https://app.example.com/cb".to_string(),
            client_id: "id".to_string(),
            state: "s".to_string(),
            scopes: Some(vec!["a".to_string(), "b".to_string()]),
            scope_joiner: Some(",".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query(&url, "scope").as_deref(), Some("a,b"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = create_authorization_url(AuthorizationUrlParams {
            authorization_endpoint: "not a url".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
