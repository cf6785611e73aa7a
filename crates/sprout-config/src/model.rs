// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sprout support assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sprout configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SproutConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Conversation behaviour.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Department/issue catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Duplicate-delivery suppression.
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Message log polling.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "sprout".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Conversation behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Token that opens the department/issue menu. Matched case-insensitively.
    #[serde(default = "default_menu_command")]
    pub menu_command: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            menu_command: default_menu_command(),
        }
    }
}

fn default_menu_command() -> String {
    "#sprout".to_string()
}

/// Catalog source. `None` uses the catalog compiled into the binary.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Path to a catalog TOML file overriding the built-in catalog.
    #[serde(default)]
    pub path: Option<String>,
}

/// Duplicate-delivery suppression settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DedupConfig {
    /// How many recently handled message ids are remembered.
    #[serde(default = "default_id_capacity")]
    pub id_capacity: usize,

    /// Identical content from the same sender within this window is dropped.
    #[serde(default = "default_content_window_secs")]
    pub content_window_secs: u64,

    /// Upper bound on remembered (sender, content) pairs.
    #[serde(default = "default_content_capacity")]
    pub content_capacity: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            id_capacity: default_id_capacity(),
            content_window_secs: default_content_window_secs(),
            content_capacity: default_content_capacity(),
        }
    }
}

fn default_id_capacity() -> usize {
    1000
}

fn default_content_window_secs() -> u64 {
    10
}

fn default_content_capacity() -> usize {
    1000
}

/// Message log polling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Seconds between polls of the message log.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "sprout.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}
