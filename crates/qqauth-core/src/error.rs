// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the qqauth strategy.

use thiserror::Error;

/// Boxed error type accepted from verification callbacks and transport sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type surfaced by strategy construction and profile retrieval.
///
/// An [`AuthOutcome::Error`](crate::types::AuthOutcome::Error) always carries one of these.
#[derive(Debug, Error)]
pub enum QqAuthError {
    /// Invalid or missing construction options (client credentials, endpoint URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// An outbound call to the provider failed at the network or HTTP level.
    ///
    /// `message` names the failing stage, e.g. `Failed to fetch uid`.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: TransportError,
    },

    /// A provider response could not be unwrapped or parsed.
    #[error("malformed provider response: {0}")]
    MalformedResponse(#[from] ResponseParseError),

    /// The application verification callback returned an error.
    #[error("verification callback failed: {0}")]
    Verification(#[source] BoxError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QqAuthError {
    /// Wraps a transport failure with the message of the stage that issued the call.
    pub fn transport(stage: impl Into<String>, source: TransportError) -> Self {
        Self::Transport {
            message: stage.into(),
            source,
        }
    }

    /// Returns true when the error originates from a response parse failure.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// A failed token-authenticated GET.
///
/// Either the request never completed (`status` is `None`) or the provider answered
/// with a non-success status, in which case the body is kept for the host.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    #[source]
    pub source: Option<BoxError>,
}

impl TransportError {
    /// A request that failed before a response was received.
    pub fn network(message: impl Into<String>, source: BoxError) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
            source: Some(source),
        }
    }

    /// A response with a non-success HTTP status.
    pub fn status(status: u16, body: String) -> Self {
        Self {
            message: format!("provider returned HTTP {status}"),
            status: Some(status),
            body: Some(body),
            source: None,
        }
    }
}

/// Failure to decode a provider payload.
#[derive(Debug, Error)]
pub enum ResponseParseError {
    /// The identity payload is not of the form `callback(<json>)`.
    #[error("response is not wrapped in `callback(...)`")]
    MissingCallbackWrapper,

    /// The payload (or the unwrapped JSONP body) is not valid JSON of the expected shape.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
