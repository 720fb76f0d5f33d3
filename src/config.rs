//! Cluster configuration: which nodes to split across and where the source
//! lives.
//!
//! ```json
//! {
//!   "nodes": ["10.0.0.2:50051", "10.0.0.3:50051"],
//!   "storage": { "kind": "s3", "endpoint": "http://10.0.0.1:9000",
//!                "user": "ROOTNAME", "password": "CHANGEME123", "bucket": "mrl-lite" }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::local::LocalFileSystem;
use crate::storage::s3::{get_min_io_client, S3FileSystem};
use crate::FileSystem;

/// Node id used when no nodes are configured.
pub const LOCAL_NODE: &str = "local";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    /// A directory on the local disk.
    Local { root: PathBuf },
    /// A bucket on an S3-compatible object store.
    S3 {
        endpoint: String,
        user: String,
        password: String,
        bucket: String,
    },
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClusterConfig {
    /// Node ids in partition order. For the gRPC transport these are worker
    /// `host:port` addresses.
    #[serde(default)]
    pub nodes: Vec<String>,
    pub storage: StorageConfig,
}

impl ClusterConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds a config from an optional file and command-line overrides.
    /// Non-empty `nodes` replace the file's nodes; `root` replaces its
    /// storage with a local directory. With no nodes from either source the
    /// cluster is the single node [`LOCAL_NODE`].
    pub fn resolve(
        file: Option<&Path>,
        nodes: Vec<String>,
        root: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match (file, root) {
            (Some(path), root) => {
                let mut config = Self::from_file(path)?;
                if let Some(root) = root {
                    config.storage = StorageConfig::Local { root };
                }
                config
            }
            (None, Some(root)) => ClusterConfig {
                nodes: Vec::new(),
                storage: StorageConfig::Local { root },
            },
            (None, None) => bail!("Either a config file or a storage root is required"),
        };
        if !nodes.is_empty() {
            config.nodes = nodes;
        }
        if config.nodes.is_empty() {
            config.nodes.push(LOCAL_NODE.to_string());
        }
        Ok(config)
    }

    /// Builds the storage backend this config describes.
    pub fn storage(&self) -> Arc<dyn FileSystem> {
        match &self.storage {
            StorageConfig::Local { root } => {
                Arc::new(LocalFileSystem::new(root.clone(), self.nodes.clone()))
            }
            StorageConfig::S3 {
                endpoint,
                user,
                password,
                bucket,
            } => {
                let client = get_min_io_client(endpoint, user, password);
                Arc::new(S3FileSystem::new(client, bucket.clone(), self.nodes.clone()))
            }
        }
    }
}
