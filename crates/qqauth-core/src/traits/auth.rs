// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication strategy trait.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{AuthOutcome, TokenRequest};

/// A strategy that turns an inbound request into one of three outcomes.
///
/// Strategies never return `Result`: transport and parse problems are reported as
/// [`AuthOutcome::Error`], rejected credentials as [`AuthOutcome::Failure`].
#[async_trait]
pub trait AuthStrategy: PluginAdapter {
    /// The application user type produced on success.
    type User: Send;

    /// Authenticates a single request.
    async fn authenticate(&self, request: &TokenRequest) -> AuthOutcome<Self::User>;
}
