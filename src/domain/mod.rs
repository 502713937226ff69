//! Domain layer: entities and the two mutation engines
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod kanban;
pub mod rebuild;
pub mod tree;

pub use error::{DomainError, LoadError};
pub use kanban::{Board, KanbanCard, KanbanColumn};
pub use tree::{DropPosition, Forest, TreeNode};
