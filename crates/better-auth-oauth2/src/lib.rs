#![doc = include_str!("../README.md")]

pub mod authorization_url;
pub mod code_exchange;
pub mod pkce;
pub mod provider;
pub mod providers;
pub mod refresh;
mod token_request;
pub mod tokens;

// Re-exports
pub use authorization_url::{create_authorization_url, AuthorizationUrlParams};
pub use code_exchange::{validate_authorization_code, CodeExchangeParams};
pub use pkce::generate_code_challenge;
pub use provider::{
    AuthenticationMethod, AuthorizationUrlData, CodeValidationData, OAuthProvider,
    ProviderOptions, UserInfoResult,
};
pub use providers::ProviderRegistry;
pub use refresh::{refresh_access_token, RefreshTokenParams};
pub use token_request::basic_auth_header;
pub use tokens::{OAuth2Tokens, OAuth2UserInfo};
