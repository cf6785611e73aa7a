// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sprout support assistant.

use thiserror::Error;

/// The primary error type used across all Sprout collaborator traits and core operations.
///
/// Parse misses and catalog misses are not errors: the interpreter answers them
/// with the help text. Only collaborator failures and startup problems end up here.
#[derive(Debug, Error)]
pub enum SproutError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The department/issue catalog is malformed. Fatal at startup.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound transport errors (unreachable endpoint, rejected message).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
