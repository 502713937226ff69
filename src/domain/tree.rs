//! Tree mutation engine: a forest of owned nodes mutated copy-on-write.
//!
//! Every operation takes the current snapshot by value and returns the next
//! one. Invalid requests (unknown ids, empty names, cyclic moves) return the
//! snapshot unchanged; nothing here fails.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::rebuild::{splice_by_id, update_by_id};

/// Root-level list of trees.
pub type Forest = Vec<TreeNode>;

/// A node in the forest. Children are owned exclusively by their parent;
/// `parent_id` is a back-reference only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl TreeNode {
    /// Collapsed, idle node without children or parent.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            is_expanded: false,
            is_loading: false,
            parent_id: None,
        }
    }

    /// Attach children, pointing their back-references at this node.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children
            .into_iter()
            .map(|child| child.with_parent(self.id.clone()))
            .collect();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn expanded(mut self) -> Self {
        self.is_expanded = true;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Ids of this node and all its descendants, pre-order.
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = vec![self.id.clone()];
        ids.extend(preorder_ids(&self.children));
        ids
    }
}

/// Where a dragged node lands relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

impl DropPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropPosition::Before => "before",
            DropPosition::After => "after",
            DropPosition::Inside => "inside",
        }
    }
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropPosition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(DropPosition::Before),
            "after" => Ok(DropPosition::After),
            "inside" => Ok(DropPosition::Inside),
            _ => Err(DomainError::InvalidDropPosition(s.to_string())),
        }
    }
}

// ============================================================
// Queries
// ============================================================

/// First node with `node_id`, pre-order.
pub fn find_node<'a>(forest: &'a [TreeNode], node_id: &str) -> Option<&'a TreeNode> {
    for node in forest {
        if node.id == node_id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, node_id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(forest: &[TreeNode], node_id: &str) -> bool {
    find_node(forest, node_id).is_some()
}

/// Structural parent of `node_id`; `None` for roots and unknown ids.
pub fn parent_of<'a>(forest: &'a [TreeNode], node_id: &str) -> Option<&'a TreeNode> {
    for node in forest {
        if node.children.iter().any(|child| child.id == node_id) {
            return Some(node);
        }
        if let Some(found) = parent_of(&node.children, node_id) {
            return Some(found);
        }
    }
    None
}

/// True if `candidate_id` sits strictly below `ancestor_id`.
pub fn is_descendant(forest: &[TreeNode], ancestor_id: &str, candidate_id: &str) -> bool {
    find_node(forest, ancestor_id)
        .map(|ancestor| contains(&ancestor.children, candidate_id))
        .unwrap_or(false)
}

/// All ids in the forest, pre-order.
pub fn preorder_ids(forest: &[TreeNode]) -> Vec<String> {
    forest.iter().flat_map(TreeNode::subtree_ids).collect()
}

/// Whether `move_node(dragged_id, target_id, _)` would change anything.
///
/// Both ids must exist, differ, and the target must not live inside the
/// dragged subtree.
pub fn can_move(forest: &[TreeNode], dragged_id: &str, target_id: &str) -> bool {
    dragged_id != target_id
        && contains(forest, dragged_id)
        && contains(forest, target_id)
        && !is_descendant(forest, dragged_id, target_id)
}

// ============================================================
// Mutations
// ============================================================

/// Flip `is_expanded` on the named node only.
pub fn toggle(forest: Forest, node_id: &str) -> Forest {
    debug!("toggle: node_id={}", node_id);
    update_by_id(forest, node_id, |node| node.is_expanded = !node.is_expanded).0
}

/// Expanded, childless and idle: the node wants its children fetched.
pub fn needs_load(forest: &[TreeNode], node_id: &str) -> bool {
    find_node(forest, node_id)
        .map(|node| node.is_expanded && node.children.is_empty() && !node.is_loading)
        .unwrap_or(false)
}

pub fn begin_load(forest: Forest, node_id: &str) -> Forest {
    debug!("begin_load: node_id={}", node_id);
    update_by_id(forest, node_id, |node| node.is_loading = true).0
}

/// Install loaded children and clear the loading flag.
///
/// The loaded nodes get their `parent_id` pointed at `node_id` regardless of
/// what the loader returned. A loaded id that is already taken elsewhere in
/// the forest gets a fresh uuid suffix, so reloading a parent whose earlier
/// children were moved away never duplicates ids. If the node has
/// disappeared in the meantime the result is dropped.
pub fn complete_load(forest: Forest, node_id: &str, children: Vec<TreeNode>) -> Forest {
    debug!("complete_load: node_id={}, children={}", node_id, children.len());
    let mut taken: HashSet<String> = preorder_ids(&forest).into_iter().collect();
    if let Some(node) = find_node(&forest, node_id) {
        // replaced below, so their ids are free again
        for id in preorder_ids(&node.children) {
            taken.remove(&id);
        }
    }
    let children: Vec<TreeNode> = children
        .into_iter()
        .map(|child| claim_ids(child, &mut taken))
        .collect();

    let (forest, found) = update_by_id(forest, node_id, |node| {
        let parent_id = node.id.clone();
        node.children = children
            .into_iter()
            .map(|child| child.with_parent(parent_id.clone()))
            .collect();
        node.is_loading = false;
    });
    if !found {
        debug!("complete_load: node {} no longer present, result dropped", node_id);
    }
    forest
}

/// Reserve the ids of `node` and its subtree, renaming any that collide.
fn claim_ids(mut node: TreeNode, taken: &mut HashSet<String>) -> TreeNode {
    if !taken.insert(node.id.clone()) {
        let fresh = format!("{}-{}", node.id, Uuid::new_v4().simple());
        debug!("complete_load: id {} already in use, loaded as {}", node.id, fresh);
        taken.insert(fresh.clone());
        node.id = fresh;
    }
    let parent_id = node.id.clone();
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(|child| claim_ids(child, taken).with_parent(parent_id.clone()))
        .collect();
    node
}

/// Failed load: clear the loading flag and leave children as they are.
pub fn abort_load(forest: Forest, node_id: &str) -> Forest {
    debug!("abort_load: node_id={}", node_id);
    update_by_id(forest, node_id, |node| node.is_loading = false).0
}

/// Append a new child named `name` (trimmed) with a fresh id.
pub fn add_child(forest: Forest, parent_id: &str, name: &str) -> Forest {
    let child_id = format!("{}-child-{}", parent_id, Uuid::new_v4().simple());
    add_child_with_id(forest, parent_id, &child_id, name)
}

/// Like [`add_child`] with a caller-chosen id.
pub fn add_child_with_id(forest: Forest, parent_id: &str, child_id: &str, name: &str) -> Forest {
    let name = name.trim();
    if name.is_empty() {
        debug!("add_child: empty name, ignored");
        return forest;
    }
    debug!("add_child: parent_id={}, child_id={}", parent_id, child_id);
    let child = TreeNode::new(child_id, name).with_parent(parent_id);
    update_by_id(forest, parent_id, |parent| parent.children.push(child)).0
}

/// Delete the node and its whole subtree.
pub fn remove(forest: Forest, node_id: &str) -> Forest {
    debug!("remove: node_id={}", node_id);
    splice_by_id(forest, node_id, |_| Vec::new()).0
}

/// Rename to the trimmed `new_name` when it is non-empty and actually different.
pub fn rename(forest: Forest, node_id: &str, new_name: &str) -> Forest {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return forest;
    }
    let unchanged = find_node(&forest, node_id)
        .map(|node| node.name == new_name)
        .unwrap_or(true);
    if unchanged {
        return forest;
    }
    debug!("rename: node_id={}, new_name={}", node_id, new_name);
    update_by_id(forest, node_id, |node| node.name = new_name.to_string()).0
}

/// Move the dragged subtree next to or into the target.
///
/// `Inside` appends to the target's children; `Before`/`After` splice into
/// the target's current sibling list and adopt its parent (none at root).
pub fn move_node(forest: Forest, dragged_id: &str, target_id: &str, position: DropPosition) -> Forest {
    if !can_move(&forest, dragged_id, target_id) {
        debug!(
            "move_node: rejected dragged_id={}, target_id={}",
            dragged_id, target_id
        );
        return forest;
    }
    debug!(
        "move_node: dragged_id={}, target_id={}, position={}",
        dragged_id, target_id, position
    );

    let mut detached = None;
    let (forest, _) = splice_by_id(forest, dragged_id, |node| {
        detached = Some(node);
        Vec::new()
    });
    let Some(mut node) = detached else {
        return forest;
    };

    match position {
        DropPosition::Inside => {
            node.parent_id = Some(target_id.to_string());
            update_by_id(forest, target_id, |target| target.children.push(node)).0
        }
        DropPosition::Before | DropPosition::After => {
            node.parent_id = parent_of(&forest, target_id).map(|parent| parent.id.clone());
            splice_by_id(forest, target_id, |target| match position {
                DropPosition::Before => vec![node, target],
                _ => vec![target, node],
            })
            .0
        }
    }
}
