// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sprout integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock outbound channel with message capture and failure injection
//! - [`MemoryStore`] - In-memory message log and ticket store
//! - [`TestHarness`] - Fully wired assistant driven through `send_message()`

pub mod harness;
pub mod memory_store;
pub mod mock_channel;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use mock_channel::MockChannel;
