//! Treeboard: a lazily loaded tree editor and a kanban board, driven by the
//! same pointer drag lifecycle.
//!
//! - `domain`: pure tree and board operations over owned snapshots
//! - `application`: services that publish snapshots and the drag adapters
//! - `infrastructure`: stores, loaders, input sources and wiring
//! - `cli`: a terminal front end over the services

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
