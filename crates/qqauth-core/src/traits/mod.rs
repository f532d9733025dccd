// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the strategy, its HTTP client and the host.
//!
//! All async traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod auth;
pub mod oauth2;
pub mod verify;

pub use adapter::PluginAdapter;
pub use auth::AuthStrategy;
pub use oauth2::OAuth2Client;
pub use verify::{verify_fn, Verify, VerifyContext, VerifyFn};
