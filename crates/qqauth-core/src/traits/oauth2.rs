// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic OAuth2 client capability used by strategies.

use async_trait::async_trait;

use crate::error::TransportError;

/// Token-authenticated HTTP access to a provider.
///
/// How the token is attached (query parameter or `Authorization` header) is the
/// implementation's policy, not the caller's.
#[async_trait]
pub trait OAuth2Client: Send + Sync {
    /// Issues a GET to `url` with `access_token` attached and returns the body text.
    ///
    /// Non-success statuses are reported as [`TransportError`].
    async fn get(&self, url: &str, access_token: &str) -> Result<String, TransportError>;
}
