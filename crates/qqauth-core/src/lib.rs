// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the qqauth strategy.
//!
//! This crate provides the trait definitions, error types, and request/profile
//! types shared by the OAuth2 client, the QQ token strategy, and the host
//! application's verification callback.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, QqAuthError, ResponseParseError, TransportError};
pub use types::{
    AuthOutcome, Credentials, HealthStatus, Photo, Profile, TokenRequest, Verified, PROVIDER,
};

pub use traits::{
    verify_fn, AuthStrategy, OAuth2Client, PluginAdapter, Verify, VerifyContext, VerifyFn,
};
