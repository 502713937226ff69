//! Application layer: services and drag adapters
//!
//! This layer binds the pure engines to their owners and collaborators
//! through the boundary traits.

pub mod drag;
pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
