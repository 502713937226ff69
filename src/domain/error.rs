//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Failure reported by a child loader.
///
/// Engines never propagate these outward; the tree service converts them
/// into the load-failure state transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("child load for {parent_id} failed: {message}")]
    Failed { parent_id: String, message: String },

    #[error("child load for {0} was dropped before completion")]
    Dropped(String),
}

impl LoadError {
    pub fn failed(parent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            parent_id: parent_id.into(),
            message: message.into(),
        }
    }
}

/// Domain errors represent lookups against a snapshot that came up empty.
///
/// The mutation engines themselves are total; these are raised by callers
/// that need to resolve an identifier before dispatching an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("tree node not found: {0}")]
    NodeNotFound(String),

    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("invalid drop position: {0} (expected before, after or inside)")]
    InvalidDropPosition(String),
}
