// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the qqauth strategy.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Default QQ OAuth2 authorization endpoint.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://graph.qq.com/oauth2.0/authorize";
/// Default QQ OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://graph.qq.com/oauth2.0/token";
/// Default identity (`openid`) endpoint.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://graph.qq.com/oauth2.0/me";
/// Default user profile endpoint.
pub const DEFAULT_PROFILE_ENDPOINT: &str = "https://graph.qq.com/user/get_user_info";

/// Top-level qqauth configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QqAuthConfig {
    /// QQ application credentials and strategy options.
    #[serde(default)]
    pub qq: QqConfig,

    /// Outbound HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// QQ token strategy options.
///
/// Everything except `client_id` and `client_secret` has a working default.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QqConfig {
    /// QQ application id (`oauth_consumer_key`).
    #[serde(default, deserialize_with = "string_or_number")]
    pub client_id: Option<String>,

    /// QQ application key.
    #[serde(default, deserialize_with = "string_or_number")]
    pub client_secret: Option<String>,

    #[serde(default = "default_authorization_url")]
    pub authorization_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Request field carrying the access token.
    #[serde(default = "default_access_token_field")]
    pub access_token_field: String,

    /// Request field carrying the optional refresh token.
    #[serde(default = "default_refresh_token_field")]
    pub refresh_token_field: String,

    /// Endpoint answering `callback({"client_id":..,"openid":..})`.
    #[serde(default = "default_identity_endpoint")]
    pub identity_endpoint: String,

    /// Endpoint answering the JSON user profile.
    #[serde(default = "default_profile_endpoint")]
    pub profile_endpoint: String,

    /// Reserved for provider-side request signing.
    #[serde(default = "default_true")]
    pub enable_proof: bool,

    /// Hand the inbound request to the verification callback.
    #[serde(default)]
    pub pass_request_to_callback: bool,
}

impl Default for QqConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            authorization_url: default_authorization_url(),
            token_url: default_token_url(),
            access_token_field: default_access_token_field(),
            refresh_token_field: default_refresh_token_field(),
            identity_endpoint: default_identity_endpoint(),
            profile_endpoint: default_profile_endpoint(),
            enable_proof: true,
            pass_request_to_callback: false,
        }
    }
}

impl QqConfig {
    /// Config with the given credentials and every other option at its default.
    pub fn with_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            ..Self::default()
        }
    }
}

impl fmt::Debug for QqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QqConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("authorization_url", &self.authorization_url)
            .field("token_url", &self.token_url)
            .field("access_token_field", &self.access_token_field)
            .field("refresh_token_field", &self.refresh_token_field)
            .field("identity_endpoint", &self.identity_endpoint)
            .field("profile_endpoint", &self.profile_endpoint)
            .field("enable_proof", &self.enable_proof)
            .field("pass_request_to_callback", &self.pass_request_to_callback)
            .finish()
    }
}

/// Credential value as written in TOML or parsed from the environment.
///
/// QQ app ids are numeric, and figment's `Env` provider parses `QQAUTH_QQ_CLIENT_ID=101234567`
/// as an integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum Credential {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Credential>::deserialize(deserializer)?.map(|value| match value {
        Credential::Text(text) => text,
        Credential::Unsigned(n) => n.to_string(),
        Credential::Signed(n) => n.to_string(),
    }))
}

fn default_authorization_url() -> String {
    DEFAULT_AUTHORIZATION_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_access_token_field() -> String {
    "access_token".to_string()
}

fn default_refresh_token_field() -> String {
    "refresh_token".to_string()
}

fn default_identity_endpoint() -> String {
    DEFAULT_IDENTITY_ENDPOINT.to_string()
}

fn default_profile_endpoint() -> String {
    DEFAULT_PROFILE_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

/// Outbound HTTP transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Whole-request timeout for each provider call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent to the provider.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("qqauth/", env!("CARGO_PKG_VERSION")).to_string()
}
