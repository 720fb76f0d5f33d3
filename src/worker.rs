//! The `Worker` gRPC service: runs the map phase of partitions sent by a
//! controller against this node's storage.

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::engine::map::map_partition;
use crate::network::proto::worker_server::{Worker, WorkerServer};
use crate::network::proto::{self, MapRequest, MapResponse};
use crate::{workload, FileSystem, Partition};

pub struct WorkerService {
    storage: Arc<dyn FileSystem>,
    /// Identifies this worker in partitions it reports on.
    node: String,
}

impl WorkerService {
    pub fn new(storage: Arc<dyn FileSystem>, node: impl Into<String>) -> Self {
        Self {
            storage,
            node: node.into(),
        }
    }
}

#[tonic::async_trait]
impl Worker for WorkerService {
    async fn map_partition(
        &self,
        request: Request<MapRequest>,
    ) -> Result<Response<MapResponse>, Status> {
        let task = request.into_inner();
        if task.start >= task.end {
            return Err(Status::invalid_argument(format!(
                "empty range [{}, {})",
                task.start, task.end
            )));
        }
        let pipeline = workload::named(&task.workload, &task.args)
            .map_err(|e| Status::invalid_argument(format!("{:#}", e)))?;

        let partition = Partition {
            node: self.node.clone(),
            start: task.start,
            end: task.end,
        };
        info!(
            workload = %task.workload,
            name = %task.name,
            start = task.start,
            end = task.end,
            "map task received"
        );

        let mapped = map_partition(self.storage.clone(), &task.name, &partition, &pipeline)
            .await
            .map_err(|e| {
                warn!(error = %e, "map task failed");
                Status::internal(e.to_string())
            })?;

        let pairs = mapped
            .into_iter()
            .map(|kv| proto::KeyValue {
                key: kv.key.to_vec(),
                value: kv.value.to_vec(),
            })
            .collect();
        Ok(Response::new(MapResponse { pairs }))
    }
}

/// Serves the worker service on `addr` until the process is stopped.
pub async fn serve(addr: SocketAddr, storage: Arc<dyn FileSystem>) -> anyhow::Result<()> {
    let service = WorkerService::new(storage, addr.to_string());
    info!(%addr, "worker listening");
    Server::builder()
        .add_service(WorkerServer::new(service))
        .serve(addr)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local::LocalFileSystem;
    use std::io::Write;

    fn service(contents: &[u8]) -> (tempfile::TempDir, WorkerService) {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("input.txt")).unwrap();
        file.write_all(contents).unwrap();
        let storage = Arc::new(LocalFileSystem::new(dir.path(), Vec::new()));
        (dir, WorkerService::new(storage, "w1:50051"))
    }

    fn request(workload: &str, start: u64, end: u64) -> Request<MapRequest> {
        Request::new(MapRequest {
            workload: workload.to_string(),
            args: Vec::new(),
            name: "input.txt".to_string(),
            start,
            end,
        })
    }

    #[tokio::test]
    async fn maps_the_requested_range() {
        let (_dir, worker) = service(b"x\ny\nx\n");
        let response = worker.map_partition(request("count", 0, 6)).await.unwrap();
        let pairs = response.into_inner().pairs;
        let keys: Vec<_> = pairs.iter().map(|kv| kv.key.clone()).collect();
        assert_eq!(keys, vec![b"x".to_vec(), b"y".to_vec(), b"x".to_vec()]);
    }

    #[tokio::test]
    async fn unknown_workload_is_invalid() {
        let (_dir, worker) = service(b"x\n");
        let status = worker.map_partition(request("nope", 0, 2)).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn missing_resource_is_internal() {
        let (_dir, worker) = service(b"x\n");
        let mut req = request("count", 0, 2);
        req.get_mut().name = "missing.txt".to_string();
        let status = worker.map_partition(req).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Internal);
    }

    #[tokio::test]
    async fn empty_range_is_invalid() {
        let (_dir, worker) = service(b"x\n");
        let status = worker.map_partition(request("count", 2, 2)).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
