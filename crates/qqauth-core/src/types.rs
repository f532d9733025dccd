// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request, credential, profile and outcome types shared by the strategy crates.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BoxError, QqAuthError};

/// Provider tag written into every normalized profile.
pub const PROVIDER: &str = "qq";

/// Health status reported by adapter health checks.
///
/// A strategy holds no connections, so a reachable adapter is healthy; failures
/// surface as `Err` from the check itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
}

/// The parts of an inbound HTTP request a token strategy reads.
///
/// Host frameworks build one of these from their own request type. The body is
/// either a JSON object or a urlencoded form; both end up as a JSON map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenRequest {
    body: Option<Map<String, Value>>,
    query: HashMap<String, String>,
}

impl TokenRequest {
    /// An empty request with no body and no query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a request from a raw (already split off) query string, e.g. `access_token=abc`.
    pub fn from_query_str(query: &str) -> Self {
        Self::new().with_query_str(query)
    }

    /// Merges the pairs of a raw query string into the query parameters.
    pub fn with_query_str(mut self, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.query
            .extend(url::form_urlencoded::parse(query.as_bytes()).into_owned());
        self
    }

    /// Sets a single query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Sets the body from a decoded JSON value. Non-object bodies carry no fields.
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = match body {
            Value::Object(map) => Some(map),
            _ => None,
        };
        self
    }

    /// Sets the body from an `application/x-www-form-urlencoded` payload.
    pub fn with_form_body(mut self, form: &str) -> Self {
        let map = url::form_urlencoded::parse(form.as_bytes())
            .into_owned()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        self.body = Some(map);
        self
    }

    /// Looks a field up in the body first, then in the query string.
    ///
    /// Empty strings count as absent, so an empty body field falls through to the query.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body_field(name).or_else(|| self.query_field(name))
    }

    /// Looks a field up in the body only.
    pub fn body_field(&self, name: &str) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get(name))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Looks a field up in the query string only.
    pub fn query_field(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Extracts credentials under the given field names.
    ///
    /// Returns `None` when no access token is present.
    pub fn credentials(&self, access_field: &str, refresh_field: &str) -> Option<Credentials> {
        let access_token = self.field(access_field)?.to_string();
        Some(Credentials {
            access_token,
            refresh_token: self.field(refresh_field).map(str::to_string),
        })
    }
}

/// Token pair presented by a client for a single authentication attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[redacted]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// A single profile photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub value: String,
}

/// Provider-agnostic user profile handed to the verification callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Always [`PROVIDER`].
    pub provider: String,
    /// The user's `openid` as returned by the identity endpoint.
    pub id: String,
    pub display_name: String,
    pub gender: String,
    pub photos: Vec<Photo>,
    /// Profile response body, verbatim.
    pub raw: String,
    /// Profile response body, parsed.
    pub parsed: Value,
}

/// What a verification callback decided about a profile.
///
/// `user: None` rejects the identity; `info` travels with either outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Verified<U> {
    pub user: Option<U>,
    pub info: Option<Value>,
}

impl<U> Verified<U> {
    /// Accept the identity as `user`.
    pub fn user(user: U) -> Self {
        Self {
            user: Some(user),
            info: None,
        }
    }

    /// Accept the identity as `user`, with extra info for the host.
    pub fn user_with_info(user: U, info: Value) -> Self {
        Self {
            user: Some(user),
            info: Some(info),
        }
    }

    /// Reject the identity with diagnostic info.
    pub fn rejected(info: Value) -> Self {
        Self {
            user: None,
            info: Some(info),
        }
    }
}

/// Final result of an authentication attempt.
///
/// `Failure` means the credentials were not accepted; `Error` means something broke
/// on the way (transport, parsing, or the callback itself).
#[derive(Debug)]
pub enum AuthOutcome<U> {
    Success { user: U, info: Option<Value> },
    Failure { info: Option<Value> },
    Error(QqAuthError),
}

impl<U> AuthOutcome<U> {
    /// Maps a verification callback result onto the three outcomes.
    pub fn from_verification(result: Result<Verified<U>, BoxError>) -> Self {
        match result {
            Err(e) => Self::Error(QqAuthError::Verification(e)),
            Ok(Verified { user: None, info }) => Self::Failure { info },
            Ok(Verified {
                user: Some(user),
                info,
            }) => Self::Success { user, info },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&U> {
        match self {
            Self::Success { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Info attached to a success or failure.
    pub fn info(&self) -> Option<&Value> {
        match self {
            Self::Success { info, .. } | Self::Failure { info } => info.as_ref(),
            Self::Error(_) => None,
        }
    }

    /// The error, if the attempt errored.
    pub fn error(&self) -> Option<&QqAuthError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure { .. } => "failure",
            Self::Error(_) => "error",
        }
    }
}
