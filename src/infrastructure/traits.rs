//! Boundary traits for the collaborators around the engines
//!
//! These traits abstract input collection, child loading and snapshot
//! ownership, allowing services to be tested with scripted implementations.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use colored::Colorize;
use tracing::warn;

use crate::domain::{LoadError, TreeNode};

/// Asynchronous source of a node's children.
///
/// Each call resolves or fails exactly once; no latency or ordering
/// guarantee is assumed.
#[async_trait]
pub trait ChildLoader: Send + Sync {
    async fn load_children(&self, parent_id: &str) -> Result<Vec<TreeNode>, LoadError>;
}

/// User input collection (prompt / confirm).
pub trait InputSource: Send + Sync {
    /// Ask for a line of text.
    /// Returns the trimmed answer, or None if the user cancels or answers blank.
    fn prompt(&self, message: &str) -> Option<String>;

    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&self, message: &str) -> bool;
}

/// Owner of the current snapshot of a collection.
///
/// Services read the snapshot, run an engine operation on it and hand the
/// full result back through `replace`; the owner is responsible for storage
/// and for notifying whoever renders it.
pub trait SnapshotStore<T>: Send + Sync {
    fn current(&self) -> T;

    fn replace(&self, next: T);
}

fn normalize_answer(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_yes(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Interactive input on stdin/stdout.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    fn read_line(&self, message: &str) -> io::Result<String> {
        print!("{} ", message.cyan());
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

impl InputSource for TerminalInput {
    fn prompt(&self, message: &str) -> Option<String> {
        match self.read_line(message) {
            Ok(line) => normalize_answer(&line),
            Err(e) => {
                warn!("prompt failed, treating as cancel: {}", e);
                None
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        match self.read_line(&format!("{} [y/N]", message)) {
            Ok(line) => is_yes(&line),
            Err(e) => {
                warn!("confirm failed, treating as no: {}", e);
                false
            }
        }
    }
}

/// Pre-recorded answers, consumed in order.
///
/// Used when answers come from command-line arguments and in tests. An
/// exhausted script behaves like a user who cancels.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: Mutex<VecDeque<String>>,
    confirmations: Mutex<VecDeque<bool>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script that answers the next prompt with `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        Self::new().with_answer(answer)
    }

    /// Script that answers the next confirmation with `yes`.
    pub fn confirming(yes: bool) -> Self {
        Self::new().with_confirmation(yes)
    }

    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.lock_answers().push_back(answer.into());
        self
    }

    pub fn with_confirmation(self, yes: bool) -> Self {
        self.lock_confirmations().push_back(yes);
        self
    }

    fn lock_answers(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.answers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_confirmations(&self) -> std::sync::MutexGuard<'_, VecDeque<bool>> {
        self.confirmations.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl InputSource for ScriptedInput {
    fn prompt(&self, _message: &str) -> Option<String> {
        self.lock_answers()
            .pop_front()
            .and_then(|answer| normalize_answer(&answer))
    }

    fn confirm(&self, _message: &str) -> bool {
        self.lock_confirmations().pop_front().unwrap_or(false)
    }
}
