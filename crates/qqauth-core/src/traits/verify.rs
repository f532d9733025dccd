// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application verification callback.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::types::{Profile, TokenRequest, Verified};

/// Everything a verification callback gets to see.
#[derive(Debug, Clone)]
pub struct VerifyContext {
    /// The inbound request; only set when the strategy passes it through.
    pub request: Option<TokenRequest>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub profile: Profile,
}

/// Application hook deciding whether a provider profile maps to a local user.
///
/// Return `Ok(Verified { user: None, .. })` to reject the identity and `Err` when the
/// lookup itself failed.
#[async_trait]
pub trait Verify: Send + Sync {
    type User: Send;

    async fn verify(&self, ctx: VerifyContext) -> Result<Verified<Self::User>, BoxError>;
}

/// [`Verify`] implementation backed by an async closure. Built with [`verify_fn`].
pub struct VerifyFn<F, U> {
    f: F,
    _user: PhantomData<fn() -> U>,
}

/// Wraps an async closure as a verification callback.
///
/// ```
/// use qqauth_core::traits::verify::verify_fn;
/// use qqauth_core::types::Verified;
///
/// let verify = verify_fn(|ctx| async move {
///     Ok::<_, qqauth_core::BoxError>(Verified::user(ctx.profile.id))
/// });
/// # let _ = verify;
/// ```
pub fn verify_fn<F, Fut, U>(f: F) -> VerifyFn<F, U>
where
    F: Fn(VerifyContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verified<U>, BoxError>> + Send + 'static,
    U: Send + 'static,
{
    VerifyFn {
        f,
        _user: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, U> Verify for VerifyFn<F, U>
where
    F: Fn(VerifyContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verified<U>, BoxError>> + Send + 'static,
    U: Send + 'static,
{
    type User = U;

    async fn verify(&self, ctx: VerifyContext) -> Result<Verified<U>, BoxError> {
        (self.f)(ctx).await
    }
}
