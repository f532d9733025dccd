// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./qqauth.toml` > `~/.config/qqauth/qqauth.toml` > `/etc/qqauth/qqauth.toml`
//! with environment variable overrides via `QQAUTH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::QqAuthConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/qqauth/qqauth.toml";
/// Local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "qqauth.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/qqauth/qqauth.toml` (system-wide)
/// 3. `~/.config/qqauth/qqauth.toml` (user XDG config)
/// 4. `./qqauth.toml` (local directory)
/// 5. `QQAUTH_*` environment variables
pub fn load_config() -> Result<QqAuthConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<QqAuthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QqAuthConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QqAuthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QqAuthConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(QqAuthConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// `<config_dir>/qqauth/qqauth.toml`, when the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("qqauth/qqauth.toml"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `QQAUTH_QQ_CLIENT_ID` must map to `qq.client_id`, not `qq.client.id`.
fn env_provider() -> Env {
    Env::prefixed("QQAUTH_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env var name to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    ["qq", "http"]
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}
