// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic OAuth2 client for the qqauth strategy.
//!
//! Provides [`ReqwestOAuth2Client`], which holds the application credentials and
//! endpoint URLs and performs token-authenticated GET requests. Strategies use it
//! through the [`OAuth2Client`] trait.

use std::time::Duration;

use async_trait::async_trait;
use qqauth_config::{HttpConfig, QqAuthConfig};
use qqauth_core::{OAuth2Client, QqAuthError, TransportError};
use secrecy::SecretString;
use tracing::debug;
use url::Url;

/// Query parameter carrying the token when the `Authorization` header is not used.
const ACCESS_TOKEN_PARAM: &str = "access_token";

/// HTTP client for provider communication.
///
/// By default the access token is sent as the `access_token` query parameter;
/// [`use_authorization_header_for_get`](Self::use_authorization_header_for_get)
/// switches GETs to `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct ReqwestOAuth2Client {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    authorization_url: String,
    token_url: String,
    use_auth_header_for_get: bool,
}

impl ReqwestOAuth2Client {
    /// Creates a client for the given application credentials and endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
        http: &HttpConfig,
    ) -> Result<Self, QqAuthError> {
        let http = reqwest::Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| QqAuthError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            client_id: client_id.into(),
            client_secret,
            authorization_url: authorization_url.into(),
            token_url: token_url.into(),
            use_auth_header_for_get: false,
        })
    }

    /// Creates a client from a loaded configuration.
    ///
    /// Fails when the client credentials are not configured.
    pub fn from_config(config: &QqAuthConfig) -> Result<Self, QqAuthError> {
        let client_id = config
            .qq
            .client_id
            .clone()
            .ok_or_else(|| QqAuthError::Config("qq.client_id is required".into()))?;
        let client_secret = config
            .qq
            .client_secret
            .clone()
            .ok_or_else(|| QqAuthError::Config("qq.client_secret is required".into()))?;

        Self::new(
            client_id,
            SecretString::from(client_secret),
            config.qq.authorization_url.clone(),
            config.qq.token_url.clone(),
            &config.http,
        )
    }

    /// Chooses how GET requests carry the access token.
    pub fn use_authorization_header_for_get(&mut self, enabled: bool) {
        self.use_auth_header_for_get = enabled;
    }

    /// Returns true when GETs send the token in the `Authorization` header.
    pub fn uses_authorization_header_for_get(&self) -> bool {
        self.use_auth_header_for_get
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The application secret, for hosts that perform the code exchange themselves.
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Builds the `response_type=code` URL a browser is sent to for the redirect flow.
    pub fn authorize_url(
        &self,
        redirect_uri: &str,
        scope: Option<&str>,
        state: Option<&str>,
    ) -> Result<Url, QqAuthError> {
        let mut url = Url::parse(&self.authorization_url).map_err(|e| {
            QqAuthError::Config(format!(
                "invalid authorization URL `{}`: {e}",
                self.authorization_url
            ))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", redirect_uri);
            if let Some(scope) = scope {
                pairs.append_pair("scope", scope);
            }
            if let Some(state) = state {
                pairs.append_pair("state", state);
            }
        }
        Ok(url)
    }

    /// Returns `url` with the access token appended, unless the header is used instead.
    fn request_url(&self, url: &str, access_token: &str) -> Result<Url, TransportError> {
        let mut parsed = Url::parse(url)
            .map_err(|e| TransportError::network(format!("invalid request URL `{url}`"), Box::new(e)))?;
        if !self.use_auth_header_for_get {
            parsed
                .query_pairs_mut()
                .append_pair(ACCESS_TOKEN_PARAM, access_token);
        }
        Ok(parsed)
    }
}

#[async_trait]
impl OAuth2Client for ReqwestOAuth2Client {
    async fn get(&self, url: &str, access_token: &str) -> Result<String, TransportError> {
        let request_url = self.request_url(url, access_token)?;

        let mut request = self.http.get(request_url);
        if self.use_auth_header_for_get {
            request = request.bearer_auth(access_token);
        }

        // Logged without the token.
        debug!(url, "sending token-authenticated GET");
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::network(format!("HTTP request failed: {e}"), Box::new(e)))?;

        let status = response.status();
        debug!(url, status = %status, "provider response received");

        let body = response.text().await.map_err(|e| {
            TransportError::network(format!("failed to read response body: {e}"), Box::new(e))
        })?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), body));
        }

        Ok(body)
    }
}
