//! [`Network`] over the `Worker` gRPC service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tonic::transport::Channel;
use tonic::Request;
use tracing::debug;

use super::proto::worker_client::WorkerClient;
use super::proto::MapRequest;
use super::Network;
use crate::{KeyValue, Partition};

/// Asks workers to run a named workload. Node ids are `host:port`
/// addresses; one channel per node is opened lazily and reused.
#[derive(Debug)]
pub struct GrpcNetwork {
    workload: String,
    args: Vec<String>,
    clients: DashMap<String, WorkerClient<Channel>>,
}

impl GrpcNetwork {
    /// `workload` and `args` must name the same pipeline the controller runs
    /// (see [`crate::workload::named`]).
    pub fn new(workload: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            workload: workload.into(),
            args,
            clients: DashMap::new(),
        }
    }

    async fn client(&self, node: &str) -> Result<WorkerClient<Channel>> {
        // Clone out of the map so no shard lock is held across the connect.
        if let Some(client) = self.clients.get(node) {
            return Ok(client.clone());
        }
        let client = WorkerClient::connect(endpoint(node))
            .await
            .with_context(|| format!("Failed to connect to worker {}", node))?;
        debug!(node, "connected to worker");
        self.clients.insert(node.to_string(), client.clone());
        Ok(client)
    }

    fn request(&self, name: &str, partition: &Partition) -> MapRequest {
        MapRequest {
            workload: self.workload.clone(),
            args: self.args.clone(),
            name: name.to_string(),
            start: partition.start,
            end: partition.end,
        }
    }
}

fn endpoint(node: &str) -> String {
    if node.starts_with("http://") || node.starts_with("https://") {
        node.to_string()
    } else {
        format!("http://{}", node)
    }
}

#[async_trait]
impl Network for GrpcNetwork {
    async fn map_partition(&self, name: &str, partition: &Partition) -> Result<Vec<KeyValue>> {
        let mut client = self.client(&partition.node).await?;
        let response = client
            .map_partition(Request::new(self.request(name, partition)))
            .await
            .with_context(|| format!("Worker {} rejected partition", partition.node))?;
        let pairs = response
            .into_inner()
            .pairs
            .into_iter()
            .map(|kv| KeyValue::new(Bytes::from(kv.key), Bytes::from(kv.value)))
            .collect();
        Ok(pairs)
    }
}
