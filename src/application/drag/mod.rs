//! Drag interaction adapters: gesture sensing and drop resolution for both widgets.

pub mod kanban;
pub mod sensor;
pub mod tree;

pub use kanban::{apply_moves, drop_card, resolve_card_drop, CardMove};
pub use sensor::{DragEvent, DragSensor, Point, Release, DEFAULT_ACTIVATION_DISTANCE};
pub use tree::{DropTarget, DropTracker};
