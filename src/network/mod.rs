//! Transport that runs a partition's map phase on a remote node.

use anyhow::Result;
use async_trait::async_trait;

use crate::{KeyValue, Partition};

pub mod grpc;

/// Generated gRPC types and stubs for the worker service.
pub mod proto {
    tonic::include_proto!("mapreduce");
}

/// The network collaborator of the engine.
///
/// Used for every partition whenever the topology has more than one node.
/// The node to run on is [`Partition::node`].
#[async_trait]
pub trait Network: Send + Sync {
    /// Maps `partition` of `name` on its node and returns the keyed values
    /// in record order.
    async fn map_partition(&self, name: &str, partition: &Partition) -> Result<Vec<KeyValue>>;
}
