//! Drop-target preview for tree drags.

use tracing::{debug, trace};

use crate::domain::tree::{self, can_move, DropPosition, Forest};

/// Node currently hovered and where the dragged node would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub node_id: String,
    pub position: DropPosition,
}

/// Tracks the dragged node and a single hover target between drag events.
///
/// The target is recomputed on every over event with the same guard as
/// [`tree::move_node`], so an invalid target is never previewed.
#[derive(Debug, Clone, Default)]
pub struct DropTracker {
    dragged: Option<String>,
    target: Option<DropTarget>,
}

impl DropTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    pub fn target(&self) -> Option<&DropTarget> {
        self.target.as_ref()
    }

    pub fn start(&mut self, dragged_id: impl Into<String>) {
        self.dragged = Some(dragged_id.into());
        self.target = None;
    }

    /// Pointer entered a drop zone (`Some`) of `node_id`, or left it (`None`).
    pub fn hover_zone(&mut self, forest: &Forest, node_id: &str, position: Option<DropPosition>) {
        match (position, self.dragged.as_deref()) {
            (Some(position), Some(dragged)) if can_move(forest, dragged, node_id) => {
                trace!("hover_zone: {} {}", position, node_id);
                self.target = Some(DropTarget {
                    node_id: node_id.to_string(),
                    position,
                });
            }
            _ => self.target = None,
        }
    }

    /// Drag-over event: `over` is the hovered node, `None` when outside all zones.
    ///
    /// Keeps the zone-refined position while hovering the same node; a newly
    /// hovered node defaults to `Inside`.
    pub fn over(&mut self, forest: &Forest, over: Option<&str>) {
        let (Some(dragged), Some(over)) = (self.dragged.as_deref(), over) else {
            self.target = None;
            return;
        };
        if !can_move(forest, dragged, over) {
            self.target = None;
            return;
        }
        let same_node = self.target.as_ref().is_some_and(|t| t.node_id == over);
        if !same_node {
            self.target = Some(DropTarget {
                node_id: over.to_string(),
                position: DropPosition::Inside,
            });
        }
    }

    /// Drag ended. Applies the previewed move when the pointer is still over
    /// a drop zone; always resets the tracker.
    pub fn end(&mut self, forest: Forest, over: Option<&str>) -> Forest {
        let dragged = self.dragged.take();
        let target = self.target.take();
        let (Some(dragged), Some(target), Some(_)) = (dragged, target, over) else {
            return forest;
        };
        debug!(
            "drop: dragged={}, target={}, position={}",
            dragged, target.node_id, target.position
        );
        tree::move_node(forest, &dragged, &target.node_id, target.position)
    }

    pub fn cancel(&mut self) {
        self.dragged = None;
        self.target = None;
    }
}
