//! Service container for dependency injection
//!
//! Wires up the owner stores, the child loader and both services.

use std::sync::Arc;

use crate::application::drag::DragSensor;
use crate::application::services::{BoardService, TreeService};
use crate::config::Settings;
use crate::domain::{Board, Forest};
use crate::infrastructure::fixtures;
use crate::infrastructure::store::MemoryStore;
use crate::infrastructure::traits::ChildLoader;
use crate::infrastructure::MockChildLoader;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Owner of the tree snapshot
    pub forest: Arc<MemoryStore<Forest>>,

    /// Owner of the board snapshot
    pub board: Arc<MemoryStore<Board>>,

    pub tree_service: TreeService,
    pub board_service: BoardService,
}

impl ServiceContainer {
    /// Create a container over the built-in mock data and the mock loader.
    pub fn new(settings: Settings) -> Self {
        let loader = Arc::new(MockChildLoader::new(settings.loader.clone()));
        Self::with_deps(
            settings,
            fixtures::initial_forest(),
            fixtures::initial_board(),
            loader,
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        forest: Forest,
        board: Board,
        loader: Arc<dyn ChildLoader>,
    ) -> Self {
        let settings = Arc::new(settings);
        let forest = Arc::new(MemoryStore::new(forest));
        let board = Arc::new(MemoryStore::new(board));

        let tree_service = TreeService::new(forest.clone(), loader);
        let board_service = BoardService::new(board.clone());

        Self {
            settings,
            forest,
            board,
            tree_service,
            board_service,
        }
    }

    /// Pointer sensor configured from the drag settings.
    pub fn drag_sensor(&self) -> DragSensor {
        DragSensor::new(self.settings.drag.activation_distance)
    }
}
