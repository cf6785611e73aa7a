// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sprout.toml` > `~/.config/sprout/sprout.toml` > `/etc/sprout/sprout.toml`
//! with environment variable overrides via the `SPROUT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SproutConfig;

/// Top-level sections that `SPROUT_<SECTION>_<KEY>` env vars map into.
const SECTIONS: &[&str] = &["agent", "assistant", "catalog", "dedup", "sync", "storage"];

/// Config files in merge order (lowest precedence first).
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/sprout/sprout.toml")];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("sprout").join("sprout.toml"));
    }
    files.push(PathBuf::from("sprout.toml"));
    files
}

/// Build the Figment used for config loading.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sprout/sprout.toml`
/// 3. `~/.config/sprout/sprout.toml`
/// 4. `./sprout.toml`
/// 5. `SPROUT_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(SproutConfig::default()));
    for file in config_file_candidates() {
        figment = figment.merge(Toml::file(file));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
pub fn load_config() -> Result<SproutConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SproutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SproutConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SproutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SproutConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Maps a prefix-stripped, lowercased env key onto a dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `SPROUT_SYNC_POLL_INTERVAL_SECS` lands on `sync.poll_interval_secs`.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("SPROUT_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("sync_poll_interval_secs"), "sync.poll_interval_secs");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("assistant_menu_command"), "assistant.menu_command");
        assert_eq!(map_env_key("dedup_id_capacity"), "dedup.id_capacity");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("whatever_key"), "whatever_key");
    }

    #[test]
    fn local_file_has_highest_file_precedence() {
        let files = config_file_candidates();
        assert_eq!(files.last().unwrap(), &PathBuf::from("sprout.toml"));
        assert_eq!(files[0], PathBuf::from("/etc/sprout/sprout.toml"));
    }
}
