// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as required credentials, endpoint URL schemes, and field name clashes.

use crate::diagnostic::ConfigError;
use crate::model::{QqAuthConfig, QqConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QqAuthConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = validate_qq(&config.qq).err().unwrap_or_default();

    if config.http.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "http.timeout_secs must be greater than zero".to_string(),
        });
    }

    if config.http.user_agent.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "http.user_agent must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the `[qq]` section on its own.
///
/// Strategies call this at construction, so options built in code get the
/// same checks as options loaded from files.
pub fn validate_qq(qq: &QqConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("client_id", &qq.client_id),
        ("client_secret", &qq.client_secret),
    ] {
        match value.as_deref().map(str::trim) {
            None => errors.push(ConfigError::MissingKey {
                key: format!("qq.{key}"),
            }),
            Some("") => errors.push(ConfigError::Validation {
                message: format!("qq.{key} must not be empty"),
            }),
            Some(_) => {}
        }
    }

    for (key, value) in [
        ("authorization_url", &qq.authorization_url),
        ("token_url", &qq.token_url),
        ("identity_endpoint", &qq.identity_endpoint),
        ("profile_endpoint", &qq.profile_endpoint),
    ] {
        if let Err(reason) = check_http_url(value) {
            errors.push(ConfigError::Validation {
                message: format!("qq.{key} `{value}` {reason}"),
            });
        }
    }

    for (key, value) in [
        ("access_token_field", &qq.access_token_field),
        ("refresh_token_field", &qq.refresh_token_field),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("qq.{key} must not be empty"),
            });
        }
    }

    if !qq.access_token_field.trim().is_empty()
        && qq.access_token_field == qq.refresh_token_field
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "qq.access_token_field and qq.refresh_token_field must differ, both are `{}`",
                qq.access_token_field
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("must use http or https, got `{other}`")),
    }
}
