// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of `get_user_info` responses into [`Profile`].

use qqauth_core::{Photo, Profile, ResponseParseError, PROVIDER};
use serde_json::Value;
use tracing::warn;

/// Avatar field copied into `photos[0]`.
const AVATAR_FIELD: &str = "figureurl_qq_2";

/// Builds the canonical profile for `openid` from a profile response body.
///
/// Missing `nickname`, `gender` and avatar fields become empty strings.
pub fn normalize_profile(openid: &str, body: String) -> Result<Profile, ResponseParseError> {
    let parsed: Value = serde_json::from_str(&body)?;

    if let Some(ret) = parsed.get("ret").and_then(Value::as_i64)
        && ret != 0
    {
        let msg = parsed.get("msg").and_then(Value::as_str).unwrap_or_default();
        warn!(ret, msg, "profile endpoint reported an error");
    }

    let display_name = text_field(&parsed, "nickname");
    let gender = text_field(&parsed, "gender");
    let avatar = text_field(&parsed, AVATAR_FIELD);

    Ok(Profile {
        provider: PROVIDER.to_string(),
        id: openid.to_string(),
        display_name,
        gender,
        photos: vec![Photo { value: avatar }],
        raw: body,
        parsed,
    })
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_profile_is_normalized() {
        let body = r#"{"ret":0,"nickname":"Alice","gender":"male","figureurl_qq_2":"http://x/y.png"}"#;
        let profile = normalize_profile("abc", body.to_string()).unwrap();

        assert_eq!(profile.provider, "qq");
        assert_eq!(profile.id, "abc");
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(profile.gender, "male");
        assert_eq!(profile.photos, vec![Photo { value: "http://x/y.png".into() }]);
        assert_eq!(profile.raw, body);
        assert_eq!(profile.parsed["ret"], json!(0));
    }

    #[test]
    fn missing_fields_become_empty() {
        let profile = normalize_profile("abc", "{}".to_string()).unwrap();
        assert_eq!(profile.display_name, "");
        assert_eq!(profile.gender, "");
        assert_eq!(profile.photos, vec![Photo { value: String::new() }]);
    }

    #[test]
    fn non_string_fields_become_empty() {
        let profile =
            normalize_profile("abc", r#"{"nickname":null,"gender":1}"#.to_string()).unwrap();
        assert_eq!(profile.display_name, "");
        assert_eq!(profile.gender, "");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = normalize_profile("abc", "<html>".to_string()).unwrap_err();
        assert!(matches!(err, ResponseParseError::InvalidJson(_)));
    }

    #[tracing_test::traced_test]
    #[test]
    fn provider_error_code_is_logged_but_profile_still_built() {
        let body = r#"{"ret":-1,"msg":"client request's parameters are invalid, invalid openid"}"#;
        let profile = normalize_profile("", body.to_string()).unwrap();
        assert_eq!(profile.id, "");
        assert!(logs_contain("profile endpoint reported an error"));
        assert!(logs_contain("invalid openid"));
        assert!(logs_contain("ret=-1"));
    }
}
