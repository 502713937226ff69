//! Built-in mock data the demo starts from.

use crate::domain::{Board, Forest, KanbanColumn, TreeNode};

/// Two empty root nodes; their children arrive through the loader.
pub fn initial_forest() -> Forest {
    vec![
        TreeNode::new("root-1", "Root Node 1"),
        TreeNode::new("root-2", "Root Node 2"),
    ]
}

/// Todo / In Progress / Done with five cards.
pub fn initial_board() -> Board {
    vec![
        KanbanColumn::new("todo", "Todo").with_cards([
            ("card-1", "Design homepage mockup"),
            ("card-2", "Set up project repository"),
        ]),
        KanbanColumn::new("in-progress", "In Progress")
            .with_cards([("card-3", "Implement user authentication")]),
        KanbanColumn::new("done", "Done").with_cards([
            ("card-4", "Create project structure"),
            ("card-5", "Set up development environment"),
        ]),
    ]
}
