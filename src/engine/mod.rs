//! The calculation engine.
//!
//! One call to [`Engine::calculate`] walks through these steps:
//!
//! 1. ask the storage for its nodes and the length of the source,
//! 2. split the source into one [`Partition`] per node,
//! 3. map every partition concurrently, in-process when there is a single
//!    node and through the [`Network`] otherwise,
//! 4. group the mapped values of all partitions by key,
//! 5. reduce every group to one value, concurrently,
//! 6. return the groups as a [`ResultTree`].
//!
//! The first failure aborts the tasks still running and is returned on its
//! own; a partial tree is never returned.

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::partition::partition;
use crate::{CalculateError, FileSystem, KeyValue, Network, Partition, Pipeline, ResultTree};

pub mod group;
pub mod map;
pub mod reduce;

use group::{group, Groups};
use map::map_partition;
use reduce::reduce_group;

/// Runs one pipeline against a storage backend.
#[derive(Clone)]
pub struct Engine {
    storage: Arc<dyn FileSystem>,
    network: Arc<dyn Network>,
    pipeline: Pipeline,
}

impl Engine {
    pub fn new(
        storage: Arc<dyn FileSystem>,
        network: Arc<dyn Network>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            storage,
            network,
            pipeline,
        }
    }

    /// Runs the pipeline over the resource called `name`.
    pub async fn calculate(&self, name: &str) -> Result<ResultTree, CalculateError> {
        let id = Uuid::new_v4();
        let span = info_span!("calculate", %id, name);
        self.run(name).instrument(span).await
    }

    async fn run(&self, name: &str) -> Result<ResultTree, CalculateError> {
        let nodes = self.storage.nodes().await.map_err(CalculateError::Topology)?;
        if nodes.is_empty() {
            return Err(CalculateError::NoNodes);
        }
        let length = self
            .storage
            .length(name)
            .await
            .map_err(|source| CalculateError::Length {
                name: name.to_string(),
                source,
            })?;

        let partitions = partition(length, &nodes);
        let local = nodes.len() == 1;
        debug!(
            length,
            nodes = nodes.len(),
            partitions = partitions.len(),
            local,
            "partitioned source"
        );

        let outputs = self.map_all(name, partitions, local).await?;
        let groups = group(outputs);
        debug!(groups = groups.len(), "grouped mapped values");

        let leaves = self.reduce_all(groups).await?;
        info!(keys = leaves.len(), "calculation complete");
        Ok(ResultTree::from_leaves(leaves))
    }

    /// Maps every partition concurrently. The returned outputs are indexed
    /// by partition.
    async fn map_all(
        &self,
        name: &str,
        partitions: Vec<Partition>,
        local: bool,
    ) -> Result<Vec<Vec<KeyValue>>, CalculateError> {
        let mut outputs = vec![Vec::new(); partitions.len()];
        let mut tasks = JoinSet::new();

        for (index, partition) in partitions.into_iter().enumerate() {
            let name = name.to_string();
            let storage = self.storage.clone();
            let network = self.network.clone();
            let pipeline = self.pipeline.clone();
            debug!(
                index,
                node = %partition.node,
                start = partition.start,
                end = partition.end,
                "dispatching partition"
            );

            tasks.spawn(
                async move {
                    let result = if local {
                        map_partition(storage, &name, &partition, &pipeline).await
                    } else {
                        network
                            .map_partition(&name, &partition)
                            .await
                            .map_err(|source| CalculateError::Dispatch {
                                node: partition.node.clone(),
                                start: partition.start,
                                end: partition.end,
                                source,
                            })
                    };
                    (index, result)
                }
                .in_current_span(),
            );
        }

        // Returning early drops the set, which aborts the partitions still
        // in flight.
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined?;
            match result {
                Ok(mapped) => {
                    debug!(index, values = mapped.len(), "partition complete");
                    outputs[index] = mapped;
                }
                Err(err) => {
                    warn!(index, error = %err, "partition failed");
                    return Err(err);
                }
            }
        }
        Ok(outputs)
    }

    /// Reduces every group on the blocking pool, since user functions may
    /// run for a long time.
    async fn reduce_all(&self, groups: Groups) -> Result<Vec<(Bytes, Bytes)>, CalculateError> {
        let mut tasks = JoinSet::new();
        for (key, values) in groups {
            let pipeline = self.pipeline.clone();
            tasks.spawn_blocking(move || {
                let reduced = reduce_group(&pipeline, &key, values);
                (key, reduced)
            });
        }

        let mut leaves = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (key, reduced) = joined?;
            match reduced {
                Ok(value) => leaves.push((key, value)),
                Err(err) => {
                    warn!(key = %String::from_utf8_lossy(&key), error = %err, "group failed");
                    return Err(err);
                }
            }
        }
        Ok(leaves)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
