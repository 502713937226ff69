//! Tree service
//!
//! Dispatches user intents to the tree engine and publishes every resulting
//! forest to the owner store. Owns the lazy child-loading flow.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::tree::{self, DropPosition, Forest};
use crate::infrastructure::traits::{ChildLoader, InputSource, SnapshotStore};

pub const ADD_CHILD_PROMPT: &str = "Enter node name:";
pub const REMOVE_NODE_CONFIRM: &str = "Are you sure you want to delete this node and all its children?";

/// Result of the lazy-load check after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Node collapsed, already has children, is loading, or is unknown
    Skipped,
    /// Loader succeeded with this many children
    Loaded(usize),
    /// Loader failed; the node was reset to not-loading
    Failed,
}

/// Service binding the tree engine to an owner store and a child loader.
pub struct TreeService {
    store: Arc<dyn SnapshotStore<Forest>>,
    loader: Arc<dyn ChildLoader>,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(store: Arc<dyn SnapshotStore<Forest>>, loader: Arc<dyn ChildLoader>) -> Self {
        Self { store, loader }
    }

    /// Current forest as held by the owner.
    pub fn forest(&self) -> Forest {
        self.store.current()
    }

    fn publish(&self, operation: impl FnOnce(Forest) -> Forest) {
        let next = operation(self.store.current());
        self.store.replace(next);
    }

    /// Toggle the node, then fetch its children if it just opened empty.
    #[instrument(level = "debug", skip(self))]
    pub async fn toggle(&self, node_id: &str) -> LoadOutcome {
        self.publish(|forest| tree::toggle(forest, node_id));
        self.load_children_if_needed(node_id).await
    }

    /// Run the lazy load when the node is expanded, childless and idle.
    ///
    /// `is_loading` is published before the loader is awaited, so a second
    /// toggle while the load is pending does not start another one. The
    /// outcome is applied to the owner's snapshot at completion time; there
    /// is no cancellation, so a result arriving after a collapse still lands.
    #[instrument(level = "debug", skip(self))]
    pub async fn load_children_if_needed(&self, node_id: &str) -> LoadOutcome {
        let current = self.store.current();
        if !tree::needs_load(&current, node_id) {
            return LoadOutcome::Skipped;
        }
        self.store.replace(tree::begin_load(current, node_id));

        match self.loader.load_children(node_id).await {
            Ok(children) => {
                let count = children.len();
                debug!("loaded {} children for {}", count, node_id);
                self.publish(|forest| tree::complete_load(forest, node_id, children));
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("child load failed for {}: {}", node_id, e);
                self.publish(|forest| tree::abort_load(forest, node_id));
                LoadOutcome::Failed
            }
        }
    }

    /// Ask for a name and append it as a child of `parent_id`.
    #[instrument(level = "debug", skip(self, input))]
    pub fn add_child(&self, parent_id: &str, input: &dyn InputSource) {
        let Some(name) = input.prompt(ADD_CHILD_PROMPT) else {
            debug!("add_child: cancelled");
            return;
        };
        self.publish(|forest| tree::add_child(forest, parent_id, &name));
    }

    /// Remove the node and its subtree after confirmation.
    #[instrument(level = "debug", skip(self, input))]
    pub fn remove(&self, node_id: &str, input: &dyn InputSource) {
        if !input.confirm(REMOVE_NODE_CONFIRM) {
            debug!("remove: declined");
            return;
        }
        self.publish(|forest| tree::remove(forest, node_id));
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rename(&self, node_id: &str, new_name: &str) {
        self.publish(|forest| tree::rename(forest, node_id, new_name));
    }

    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&self, dragged_id: &str, target_id: &str, position: DropPosition) {
        self.publish(|forest| tree::move_node(forest, dragged_id, target_id, position));
    }
}
