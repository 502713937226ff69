//! Simulated child loader with artificial latency.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::config::LoaderConfig;
use crate::domain::{LoadError, TreeNode};
use crate::infrastructure::traits::ChildLoader;

/// Generates a random number of children after a configurable delay.
///
/// Child ids are `<parent>-child-<i>`; names are `Child <i+1> of <suffix>`
/// where the suffix is the last dash-separated segment of the parent id.
#[derive(Debug, Clone)]
pub struct MockChildLoader {
    config: LoaderConfig,
}

impl MockChildLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Build `count` children for `parent_id`.
    pub fn generate(parent_id: &str, count: usize) -> Vec<TreeNode> {
        let suffix = parent_id.rsplit('-').next().unwrap_or(parent_id);
        (0..count)
            .map(|i| {
                TreeNode::new(
                    format!("{}-child-{}", parent_id, i),
                    format!("Child {} of {}", i + 1, suffix),
                )
                .with_parent(parent_id)
            })
            .collect()
    }
}

#[async_trait]
impl ChildLoader for MockChildLoader {
    async fn load_children(&self, parent_id: &str) -> Result<Vec<TreeNode>, LoadError> {
        // decide up front: the thread-local rng must not live across the await
        let (count, fail) = {
            let mut rng = rand::rng();
            let low = self.config.min_children.min(self.config.max_children);
            let count = rng.random_range(low..=self.config.max_children);
            let fail = rng.random_bool(self.config.failure_rate.clamp(0.0, 1.0));
            (count, fail)
        };

        tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;

        if fail {
            debug!("mock loader: simulated failure for {}", parent_id);
            return Err(LoadError::failed(parent_id, "simulated failure"));
        }
        debug!("mock loader: {} children for {}", count, parent_id);
        Ok(Self::generate(parent_id, count))
    }
}
