//! Application services
//!
//! Services bind the engines to owner stores, input sources and loaders.

pub mod board;
pub mod tree;

pub use board::BoardService;
pub use tree::{LoadOutcome, TreeService};
