//! Tests for lazy child loading through TreeService

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use treeboard::application::services::{LoadOutcome, TreeService};
use treeboard::config::LoaderConfig;
use treeboard::domain::tree::{find_node, preorder_ids};
use treeboard::domain::{DropPosition, Forest, LoadError, TreeNode};
use treeboard::infrastructure::traits::{ChildLoader, ScriptedInput, SnapshotStore};
use treeboard::infrastructure::{MemoryStore, MockChildLoader};
use treeboard::util::testing;

/// Loader that counts calls and holds every load until the gate opens.
struct GatedLoader {
    calls: AtomicUsize,
    gate: Notify,
    count: usize,
}

impl GatedLoader {
    fn new(count: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
            count,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn release(&self) {
        self.gate.notify_one();
    }

    /// Yield until `n` loads have started.
    async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ChildLoader for GatedLoader {
    async fn load_children(&self, parent_id: &str) -> Result<Vec<TreeNode>, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(MockChildLoader::generate(parent_id, self.count))
    }
}

/// Loader that always fails immediately.
struct FailingLoader;

#[async_trait]
impl ChildLoader for FailingLoader {
    async fn load_children(&self, parent_id: &str) -> Result<Vec<TreeNode>, LoadError> {
        Err(LoadError::Dropped(parent_id.to_string()))
    }
}

fn leaf_forest() -> Forest {
    vec![
        TreeNode::new("root-1", "Root Node 1"),
        TreeNode::new("root-2", "Root Node 2"),
    ]
}

fn setup(loader: Arc<dyn ChildLoader>) -> (Arc<MemoryStore<Forest>>, TreeService) {
    testing::init_test_setup();
    let store = Arc::new(MemoryStore::new(leaf_forest()));
    let service = TreeService::new(store.clone(), loader);
    (store, service)
}

fn node(store: &MemoryStore<Forest>, id: &str) -> TreeNode {
    find_node(&store.current(), id).cloned().unwrap()
}

#[tokio::test]
async fn given_empty_collapsed_leaf_when_toggling_then_loads_children_once() {
    // Arrange
    let loader = Arc::new(GatedLoader::new(3));
    let (store, service) = setup(loader.clone());
    loader.release();

    // Act
    let outcome = service.toggle("root-1").await;

    // Assert
    assert_eq!(outcome, LoadOutcome::Loaded(3));
    assert_eq!(loader.calls(), 1);
    let root = node(&store, "root-1");
    assert!(root.is_expanded);
    assert!(!root.is_loading);
    assert_eq!(root.children.len(), 3);
    assert!(root
        .children
        .iter()
        .all(|c| c.parent_id.as_deref() == Some("root-1")));
}

#[tokio::test]
async fn given_loaded_node_when_collapsing_and_expanding_then_no_new_load() {
    let loader = Arc::new(GatedLoader::new(2));
    let (_store, service) = setup(loader.clone());
    loader.release();
    service.toggle("root-1").await;

    assert_eq!(service.toggle("root-1").await, LoadOutcome::Skipped);
    assert_eq!(service.toggle("root-1").await, LoadOutcome::Skipped);

    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn given_pending_load_when_collapsing_and_expanding_again_then_no_second_load() {
    // Arrange
    let loader = Arc::new(GatedLoader::new(2));
    let (store, service) = setup(loader.clone());

    // Act
    let (first, (collapse, reexpand)) = tokio::join!(service.toggle("root-1"), async {
        loader.wait_for_calls(1).await;
        assert!(node(&store, "root-1").is_loading);
        let collapse = service.toggle("root-1").await;
        let reexpand = service.toggle("root-1").await;
        loader.release();
        (collapse, reexpand)
    });

    // Assert
    assert_eq!(loader.calls(), 1);
    assert_eq!(collapse, LoadOutcome::Skipped);
    assert_eq!(reexpand, LoadOutcome::Skipped);
    assert_eq!(first, LoadOutcome::Loaded(2));
    let root = node(&store, "root-1");
    assert!(root.is_expanded);
    assert!(!root.is_loading);
    assert_eq!(root.children.len(), 2);
}

#[tokio::test]
async fn given_pending_load_when_collapsed_before_completion_then_result_still_applied() {
    let loader = Arc::new(GatedLoader::new(1));
    let (store, service) = setup(loader.clone());

    let (first, _) = tokio::join!(service.toggle("root-2"), async {
        loader.wait_for_calls(1).await;
        service.toggle("root-2").await;
        loader.release();
    });

    assert_eq!(first, LoadOutcome::Loaded(1));
    let root = node(&store, "root-2");
    assert!(!root.is_expanded);
    assert_eq!(root.children[0].id, "root-2-child-0");
}

#[tokio::test]
async fn given_pending_load_when_node_removed_then_result_dropped() {
    let loader = Arc::new(GatedLoader::new(2));
    let (store, service) = setup(loader.clone());

    tokio::join!(service.toggle("root-1"), async {
        loader.wait_for_calls(1).await;
        service.remove("root-1", &ScriptedInput::confirming(true));
        loader.release();
    });

    let forest = store.current();
    assert!(find_node(&forest, "root-1").is_none());
    assert!(find_node(&forest, "root-1-child-0").is_none());
    assert_eq!(forest.len(), 1);
}

#[tokio::test]
async fn given_failing_loader_when_toggling_then_node_reverts_to_idle_and_empty() {
    // Arrange
    let (store, service) = setup(Arc::new(FailingLoader));

    // Act
    let outcome = service.toggle("root-1").await;

    // Assert
    assert_eq!(outcome, LoadOutcome::Failed);
    let root = node(&store, "root-1");
    assert!(root.is_expanded);
    assert!(!root.is_loading);
    assert!(root.children.is_empty());
}

#[tokio::test]
async fn given_failed_load_when_toggling_again_then_load_is_retried() {
    let (store, service) = setup(Arc::new(FailingLoader));
    service.toggle("root-1").await;

    // collapse, then expand retries because the node is still childless
    assert_eq!(service.toggle("root-1").await, LoadOutcome::Skipped);
    assert_eq!(service.toggle("root-1").await, LoadOutcome::Failed);
    assert!(!node(&store, "root-1").is_loading);
}

#[tokio::test]
async fn given_listener_when_loading_then_sees_toggle_loading_and_result_snapshots() {
    // Arrange
    let loader = Arc::new(GatedLoader::new(1));
    let (store, service) = setup(loader.clone());
    let seen: Arc<Mutex<Vec<(bool, bool, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |forest: &Forest| {
        let root = &forest[0];
        sink.lock()
            .unwrap()
            .push((root.is_expanded, root.is_loading, root.children.len()));
    });
    loader.release();

    // Act
    service.toggle("root-1").await;

    // Assert
    assert_eq!(store.revision(), 3);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(true, false, 0), (true, true, 0), (true, false, 1)]
    );
}

#[tokio::test]
async fn given_unknown_node_when_toggling_then_no_load() {
    let loader = Arc::new(GatedLoader::new(1));
    let (store, service) = setup(loader.clone());

    let outcome = service.toggle("missing").await;

    assert_eq!(outcome, LoadOutcome::Skipped);
    assert_eq!(loader.calls(), 0);
    assert_eq!(store.current(), leaf_forest());
}

#[tokio::test]
async fn given_loaded_child_moved_away_when_parent_reloads_then_ids_stay_unique() {
    // Arrange
    let loader = MockChildLoader::new(LoaderConfig {
        delay_ms: 0,
        min_children: 1,
        max_children: 1,
        failure_rate: 0.0,
    });
    let (store, service) = setup(Arc::new(loader));
    assert_eq!(service.toggle("root-1").await, LoadOutcome::Loaded(1));
    service.move_node("root-1-child-0", "root-2", DropPosition::Inside);

    // Act: collapse, then expand the now childless parent
    service.toggle("root-1").await;
    let reload = service.toggle("root-1").await;

    // Assert
    assert_eq!(reload, LoadOutcome::Loaded(1));
    let ids = preorder_ids(&store.current());
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len(), "duplicate ids: {:?}", ids);
    assert_eq!(node(&store, "root-1-child-0").parent_id.as_deref(), Some("root-2"));
    let reloaded = &node(&store, "root-1").children[0];
    assert_ne!(reloaded.id, "root-1-child-0");
    assert_eq!(reloaded.parent_id.as_deref(), Some("root-1"));
}
