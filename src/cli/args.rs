//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::DropPosition;

/// Drive the tree and kanban mutation engines over built-in mock data
#[derive(Parser, Debug)]
#[command(name = "treeboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "TREEBOARD_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with the hierarchical tree
    Tree {
        /// Expand these nodes first (lazy-loading their children), in order
        #[arg(short, long = "expand", value_name = "NODE_ID", global = true)]
        expand: Vec<String>,

        #[command(subcommand)]
        command: TreeCommands,
    },

    /// Work with the kanban board
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Print the forest
    Show,

    /// Toggle nodes open, loading children on first expansion
    Toggle {
        /// Node ids, toggled in order
        #[arg(required = true)]
        nodes: Vec<String>,
    },

    /// Add a child node (prompts for the name if omitted)
    Add {
        parent: String,
        name: Option<String>,
    },

    /// Remove a node and its subtree
    Remove {
        node: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Rename a node
    Rename { node: String, name: String },

    /// Drag a node before, after or inside another
    Move {
        dragged: String,
        target: String,
        /// before | after | inside
        position: DropPosition,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Print all columns
    Show,

    /// Add a card (prompts for the title if omitted)
    Add {
        column: String,
        title: Option<String>,
    },

    /// Delete a card
    Delete {
        card: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Edit a card title
    Edit { card: String, title: String },

    /// Drop a card onto a column or another card
    Drop {
        card: String,
        /// Column id or card id under the pointer
        over: String,
    },

    /// Print the board as TOML
    Export,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
}
