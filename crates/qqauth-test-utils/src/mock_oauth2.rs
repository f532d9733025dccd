// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted OAuth2 client for deterministic strategy tests.
//!
//! `MockOAuth2Client` implements `OAuth2Client` with pre-configured responses and
//! records every request, so tests can assert call order and arguments without a
//! network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use qqauth_core::{OAuth2Client, TransportError};

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// A successful response with this body.
    Body(String),
    /// A non-success HTTP status with this body.
    Status(u16, String),
    /// A connection-level failure with this message.
    NetworkFailure(String),
}

impl MockResponse {
    pub fn body(body: impl Into<String>) -> Self {
        Self::Body(body.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status(status, body.into())
    }

    pub fn network_failure(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }
}

/// A request seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub access_token: String,
}

/// An OAuth2 client that replays scripted responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty the call
/// fails with a network error naming the unexpected URL.
pub struct MockOAuth2Client {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockOAuth2Client {
    /// Create a mock client with an empty response queue.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock client pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn push_response(&self, response: MockResponse) {
        self.responses.lock().await.push_back(response);
    }

    /// Requests made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockOAuth2Client {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OAuth2Client for MockOAuth2Client {
    async fn get(&self, url: &str, access_token: &str) -> Result<String, TransportError> {
        self.calls.lock().await.push(RecordedCall {
            url: url.to_string(),
            access_token: access_token.to_string(),
        });

        let next = self.responses.lock().await.pop_front();
        match next {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status, body)) => Err(TransportError::status(status, body)),
            Some(MockResponse::NetworkFailure(message)) => Err(TransportError::network(
                message.clone(),
                message.into(),
            )),
            None => Err(TransportError::network(
                format!("no scripted response for {url}"),
                "mock response queue is empty".into(),
            )),
        }
    }
}
