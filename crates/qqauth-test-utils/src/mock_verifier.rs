// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording verification callback.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use qqauth_core::{BoxError, Verified, Verify, VerifyContext};

/// What the mock verifier answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Accept with this user value.
    Accept(Value),
    /// Reject with this info payload.
    Reject(Value),
    /// Fail the lookup with this message.
    Fail(String),
}

/// A verifier that returns a fixed verdict and records every context it sees.
#[derive(Clone)]
pub struct MockVerifier {
    verdict: Verdict,
    seen: Arc<Mutex<Vec<VerifyContext>>>,
}

impl MockVerifier {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn accepting(user: Value) -> Self {
        Self::new(Verdict::Accept(user))
    }

    pub fn rejecting(info: Value) -> Self {
        Self::new(Verdict::Reject(info))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Verdict::Fail(message.into()))
    }

    /// Contexts passed to the verifier so far, oldest first.
    pub async fn contexts(&self) -> Vec<VerifyContext> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl Verify for MockVerifier {
    type User = Value;

    async fn verify(&self, ctx: VerifyContext) -> Result<Verified<Value>, BoxError> {
        self.seen.lock().await.push(ctx);
        match &self.verdict {
            Verdict::Accept(user) => Ok(Verified::user(user.clone())),
            Verdict::Reject(info) => Ok(Verified::rejected(info.clone())),
            Verdict::Fail(message) => Err(message.clone().into()),
        }
    }
}
