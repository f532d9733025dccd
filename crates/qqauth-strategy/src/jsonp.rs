// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity endpoint payload decoding.
//!
//! The identity endpoint answers with a JSONP body such as
//! `callback( {"client_id":"101","openid":"ABC"} );` rather than plain JSON.

use qqauth_core::ResponseParseError;
use serde_json::Value;
use tracing::warn;

const CALLBACK_PREFIX: &str = "callback(";

/// `client_id` and `openid` as reported by the identity endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityResult {
    pub client_id: String,
    pub openid: String,
}

/// Returns the text between the first `callback(` and the last `)`.
pub fn unwrap_jsonp(body: &str) -> Result<&str, ResponseParseError> {
    let start = body
        .find(CALLBACK_PREFIX)
        .ok_or(ResponseParseError::MissingCallbackWrapper)?
        + CALLBACK_PREFIX.len();
    let end = body
        .rfind(')')
        .filter(|&end| end >= start)
        .ok_or(ResponseParseError::MissingCallbackWrapper)?;
    Ok(&body[start..end])
}

/// Unwraps and parses an identity payload.
///
/// Absent fields come back empty; only a broken wrapper or invalid JSON is an error.
pub fn parse_identity(body: &str) -> Result<IdentityResult, ResponseParseError> {
    let value: Value = serde_json::from_str(unwrap_jsonp(body)?)?;

    if let Some(description) = value.get("error_description").and_then(Value::as_str) {
        let code = value.get("error").map(ToString::to_string).unwrap_or_default();
        warn!(error = %code, description, "identity endpoint reported an error");
    }

    Ok(IdentityResult {
        client_id: string_field(&value, "client_id"),
        openid: string_field(&value, "openid"),
    })
}

/// Reads a string (or numeric) field, empty when absent.
fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
