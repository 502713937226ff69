//! Conversions into `termtree` for terminal display.

use termtree::Tree;
use tracing::instrument;

use crate::domain::TreeNode;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// `Name [id]` with an expand marker and a loading hint.
fn label(node: &TreeNode) -> String {
    let marker = match (node.has_children(), node.is_expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "",
    };
    let loading = if node.is_loading { " (loading...)" } else { "" };
    format!("{}{} [{}]{}", marker, node.name, node.id, loading)
}

impl TreeNodeConvert for TreeNode {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let mut tree = Tree::new(label(self));
        // collapsed nodes hide their children, like the widget does
        if self.is_expanded {
            tree = tree.with_leaves(self.children.iter().map(|c| c.to_tree_string()));
        }
        tree
    }
}

impl TreeNodeConvert for [TreeNode] {
    fn to_tree_string(&self) -> Tree<String> {
        Tree::new("forest".to_string()).with_leaves(self.iter().map(|n| n.to_tree_string()))
    }
}
