// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for qqauth integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! reaching the QQ endpoints.
//!
//! # Components
//!
//! - [`MockOAuth2Client`] - Scripted OAuth2 client that records requests
//! - [`MockVerifier`] - Verification callback with a fixed verdict

pub mod mock_oauth2;
pub mod mock_verifier;

pub use mock_oauth2::{MockOAuth2Client, MockResponse, RecordedCall};
pub use mock_verifier::{MockVerifier, Verdict};
