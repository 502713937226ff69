//! Infrastructure layer: boundary implementations and mock data
//!
//! This layer implements the boundary traits (input, loading, snapshot
//! ownership) and wires up services.

pub mod di;
pub mod error;
pub mod fixtures;
pub mod mock_loader;
pub mod store;
pub mod traits;

pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
pub use mock_loader::MockChildLoader;
pub use store::MemoryStore;
