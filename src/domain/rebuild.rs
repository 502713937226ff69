//! Copy-on-write splicing over a forest of owned nodes.
//!
//! Every tree mutation is expressed as "find the first node matching a
//! predicate in pre-order, replace it with zero, one or more nodes, and
//! rebuild the ancestors on the way back up". Untouched subtrees are moved
//! into the result rather than cloned.

use crate::domain::tree::TreeNode;

/// Replace the first pre-order match of `predicate` with the nodes returned by `edit`.
///
/// - `vec![]` deletes the match together with its subtree
/// - `vec![node]` replaces it
/// - `vec![a, b]` splices two siblings in its place
///
/// Returns the rebuilt forest and whether a match was found. When nothing
/// matches the forest is returned structurally unchanged and `edit` is never
/// called.
pub fn splice_first<P, F>(forest: Vec<TreeNode>, predicate: P, edit: F) -> (Vec<TreeNode>, bool)
where
    P: Fn(&TreeNode) -> bool,
    F: FnOnce(TreeNode) -> Vec<TreeNode>,
{
    let mut edit = Some(edit);
    let rebuilt = splice_level(forest, &predicate, &mut edit);
    (rebuilt, edit.is_none())
}

/// Convenience wrapper for splicing by node id.
pub fn splice_by_id<F>(forest: Vec<TreeNode>, node_id: &str, edit: F) -> (Vec<TreeNode>, bool)
where
    F: FnOnce(TreeNode) -> Vec<TreeNode>,
{
    splice_first(forest, |node| node.id == node_id, edit)
}

/// Apply `update` to the first node with `node_id`, keeping it in place.
pub fn update_by_id<F>(forest: Vec<TreeNode>, node_id: &str, update: F) -> (Vec<TreeNode>, bool)
where
    F: FnOnce(&mut TreeNode),
{
    splice_by_id(forest, node_id, |mut node| {
        update(&mut node);
        vec![node]
    })
}

fn splice_level<P, F>(nodes: Vec<TreeNode>, predicate: &P, edit: &mut Option<F>) -> Vec<TreeNode>
where
    P: Fn(&TreeNode) -> bool,
    F: FnOnce(TreeNode) -> Vec<TreeNode>,
{
    let mut out = Vec::with_capacity(nodes.len() + 1);
    for mut node in nodes {
        // already applied: move the rest through untouched
        if edit.is_none() {
            out.push(node);
            continue;
        }
        if predicate(&node) {
            if let Some(apply) = edit.take() {
                out.extend(apply(node));
            }
            continue;
        }
        if !node.children.is_empty() {
            let children = std::mem::take(&mut node.children);
            node.children = splice_level(children, predicate, edit);
        }
        out.push(node);
    }
    out
}
