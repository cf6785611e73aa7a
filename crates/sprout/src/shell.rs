// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprout shell` command implementation.
//!
//! Interactive REPL with readline history. Each line is appended to the
//! incoming log as a message from `--from` and dispatched immediately; the
//! reply is printed by the console channel.
//!
//! Duplicate tracking lives in this process only. A `sprout serve` polling
//! the same database will answer these messages again.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sprout_catalog::Catalog;
use sprout_config::model::SproutConfig;
use sprout_core::{SproutError, StorageAdapter};
use sprout_engine::{Dispatch, SupportAssistant};

use crate::console::ConsoleChannel;

/// Runs the `sprout shell` interactive REPL.
pub async fn run_shell(
    config: SproutConfig,
    catalog: Catalog,
    from: String,
) -> Result<(), SproutError> {
    let storage = crate::open_storage(&config).await?;
    let channel = Arc::new(ConsoleChannel::new());
    let mut assistant = SupportAssistant::from_config(
        &config,
        Arc::new(catalog),
        storage.clone(),
        storage.clone(),
        channel,
    );
    let menu = config.assistant.menu_command.clone();

    let mut rl = DefaultEditor::new()
        .map_err(|e| SproutError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "sprout shell".bold().green());
    println!(
        "Chatting as {}. Type {} to begin, {} to exit.\n",
        from.cyan(),
        menu.yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", from.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match assistant.accept(&from, trimmed).await {
                    Ok(dispatch) => {
                        if let Some(note) = describe(&dispatch) {
                            println!("{}\n", note.dimmed());
                        }
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    storage.close().await?;
    Ok(())
}

/// A note for turns that printed nothing.
fn describe(dispatch: &Dispatch) -> Option<String> {
    match dispatch {
        Dispatch::Replied { .. } => None,
        Dispatch::Duplicate => Some("(already handled)".to_string()),
        Dispatch::Repeated => Some("(same message just sent, skipped)".to_string()),
        Dispatch::Ignored { rule } => Some(format!("(no reply: {rule})")),
    }
}
