// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: non-empty paths,
//! positive capacities and intervals, a usable menu command.

use crate::diagnostic::ConfigError;
use crate::model::SproutConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SproutConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.agent.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let command = &config.assistant.menu_command;
    if command.trim().is_empty() {
        fail("assistant.menu_command must not be empty".to_string());
    } else if command.chars().any(char::is_whitespace) {
        fail(format!(
            "assistant.menu_command `{command}` must be a single token without whitespace"
        ));
    }

    if config
        .catalog
        .path
        .as_deref()
        .is_some_and(|path| path.trim().is_empty())
    {
        fail("catalog.path must not be empty when set".to_string());
    }

    if config.dedup.id_capacity == 0 {
        fail("dedup.id_capacity must be at least 1".to_string());
    }
    if config.dedup.content_capacity == 0 {
        fail("dedup.content_capacity must be at least 1".to_string());
    }
    if config.dedup.content_window_secs == 0 {
        fail("dedup.content_window_secs must be at least 1".to_string());
    }

    if config.sync.poll_interval_secs == 0 {
        fail("sync.poll_interval_secs must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
