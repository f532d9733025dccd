// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! QQ access-token authentication strategy.
//!
//! Implements [`AuthStrategy`] for clients that already hold a QQ access token
//! (for example a mobile app that ran the QQ SDK login). The token is read from
//! the request body or query string, resolved to an `openid` through the
//! identity endpoint, and expanded into a [`Profile`] through the profile
//! endpoint. The application's [`Verify`] callback then maps the profile to a
//! local user.
//!
//! ```no_run
//! use qqauth_config::{QqAuthConfig, QqConfig};
//! use qqauth_core::{verify_fn, AuthStrategy, BoxError, TokenRequest, Verified};
//! use qqauth_strategy::QqTokenStrategy;
//!
//! # async fn run() -> Result<(), qqauth_core::QqAuthError> {
//! let config = QqAuthConfig {
//!     qq: QqConfig::with_credentials("123456789", "shhh-its-a-secret"),
//!     ..QqAuthConfig::default()
//! };
//! let strategy = QqTokenStrategy::new(
//!     &config,
//!     verify_fn(|ctx| async move { Ok::<_, BoxError>(Verified::user(ctx.profile.id)) }),
//! )?;
//!
//! let outcome = strategy
//!     .authenticate(&TokenRequest::from_query_str("access_token=abc"))
//!     .await;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod jsonp;
pub mod profile;

pub use jsonp::{parse_identity, unwrap_jsonp, IdentityResult};
pub use profile::normalize_profile;

use std::sync::Arc;

use async_trait::async_trait;
use qqauth_config::{validate_qq, QqAuthConfig, QqConfig};
use qqauth_core::{
    AuthOutcome, AuthStrategy, HealthStatus, OAuth2Client, PluginAdapter, Profile, QqAuthError,
    TokenRequest, Verify, VerifyContext,
};
use qqauth_oauth2::ReqwestOAuth2Client;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

/// Name the strategy registers under.
pub const STRATEGY_NAME: &str = "qq-token";

/// Stage message for a failed identity call.
pub const FETCH_UID_FAILED: &str = "Failed to fetch uid";
/// Stage message for a failed profile call.
pub const FETCH_PROFILE_FAILED: &str = "Failed to fetch user profile";

/// Token-based QQ login strategy.
///
/// Holds immutable options and a shared OAuth2 client, so one value can serve
/// any number of concurrent authentication attempts.
pub struct QqTokenStrategy<V> {
    client: Arc<dyn OAuth2Client>,
    options: QqConfig,
    verify: V,
}

impl<V: Verify + 'static> QqTokenStrategy<V> {
    /// Creates the strategy with a reqwest-backed OAuth2 client.
    ///
    /// The client sends the access token as a query parameter, never in the
    /// `Authorization` header.
    pub fn new(config: &QqAuthConfig, verify: V) -> Result<Self, QqAuthError> {
        check_options(&config.qq)?;

        let mut client = ReqwestOAuth2Client::from_config(config)?;
        client.use_authorization_header_for_get(false);

        let strategy = Self::build(config.qq.clone(), Arc::new(client), verify);
        info!(
            identity_endpoint = %strategy.options.identity_endpoint,
            profile_endpoint = %strategy.options.profile_endpoint,
            "QQ token strategy initialized"
        );
        Ok(strategy)
    }

    /// Creates the strategy on top of an existing OAuth2 client.
    pub fn with_client(
        options: QqConfig,
        client: Arc<dyn OAuth2Client>,
        verify: V,
    ) -> Result<Self, QqAuthError> {
        check_options(&options)?;
        Ok(Self::build(options, client, verify))
    }

    fn build(options: QqConfig, client: Arc<dyn OAuth2Client>, verify: V) -> Self {
        Self {
            client,
            options,
            verify,
        }
    }

    pub fn options(&self) -> &QqConfig {
        &self.options
    }

    /// Whether provider-side request signing is requested. Not used by the token flow.
    pub fn enable_proof(&self) -> bool {
        self.options.enable_proof
    }

    /// Resolves an access token to a normalized profile.
    ///
    /// Calls the identity endpoint, then the profile endpoint with the returned
    /// `client_id`/`openid`. A malformed identity payload stops before the second call.
    pub async fn retrieve_profile(&self, access_token: &str) -> Result<Profile, QqAuthError> {
        let body = self
            .client
            .get(&self.options.identity_endpoint, access_token)
            .await
            .map_err(|e| QqAuthError::transport(FETCH_UID_FAILED, e))?;

        let identity = parse_identity(&body)?;
        if identity.openid.is_empty() {
            warn!("identity response carried no openid, requesting profile anyway");
        }

        let profile_url = self.profile_url(&identity)?;
        let body = self
            .client
            .get(profile_url.as_str(), access_token)
            .await
            .map_err(|e| QqAuthError::transport(FETCH_PROFILE_FAILED, e))?;

        let profile = normalize_profile(&identity.openid, body)?;
        debug!(openid = %profile.id, "QQ profile loaded");
        Ok(profile)
    }

    fn profile_url(&self, identity: &IdentityResult) -> Result<Url, QqAuthError> {
        let mut url = Url::parse(&self.options.profile_endpoint).map_err(|e| {
            QqAuthError::Config(format!(
                "invalid profile endpoint `{}`: {e}",
                self.options.profile_endpoint
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("oauth_consumer_key", &identity.client_id)
            .append_pair("openid", &identity.openid);
        Ok(url)
    }
}

/// Validates construction options, flattening diagnostics into one config error.
fn check_options(options: &QqConfig) -> Result<(), QqAuthError> {
    validate_qq(options).map_err(|errors| {
        QqAuthError::Config(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    })
}

#[async_trait]
impl<V: Verify + 'static> PluginAdapter for QqTokenStrategy<V> {
    fn name(&self) -> &str {
        STRATEGY_NAME
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, QqAuthError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl<V: Verify + 'static> AuthStrategy for QqTokenStrategy<V> {
    type User = V::User;

    async fn authenticate(&self, request: &TokenRequest) -> AuthOutcome<V::User> {
        let field = &self.options.access_token_field;
        let Some(credentials) = request.credentials(field, &self.options.refresh_token_field)
        else {
            debug!(field = %field, "request carries no access token");
            return AuthOutcome::Failure {
                info: Some(json!({ "message": format!("You should provide {field}") })),
            };
        };

        let profile = match self.retrieve_profile(&credentials.access_token).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "failed to load QQ profile");
                return AuthOutcome::Error(e);
            }
        };

        let ctx = VerifyContext {
            request: self
                .options
                .pass_request_to_callback
                .then(|| request.clone()),
            access_token: credentials.access_token,
            refresh_token: credentials.refresh_token,
            profile,
        };

        let outcome = AuthOutcome::from_verification(self.verify.verify(ctx).await);
        info!(outcome = outcome.kind(), "QQ token authentication finished");
        outcome
    }
}
