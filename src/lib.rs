//! A distributed MapReduce engine that reduces keyed groups to a result tree.
//!
//! Users describe a computation as a chain of one map function, zero or more
//! reduce functions and one final reduce function. The [`Engine`] splits a
//! named source by byte range across the nodes reported by a [`FileSystem`],
//! maps every partition in parallel (in-process, or on remote workers through
//! a [`Network`]), groups the mapped values by key and reduces each group to
//! a single value.
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use bytes::Bytes;
//! # use mrtree::storage::local::LocalFileSystem;
//! # use mrtree::network::grpc::GrpcNetwork;
//! # async fn run() -> anyhow::Result<()> {
//! let pipeline = mrtree::build(|record: &[u8]| Some(Bytes::copy_from_slice(record)))
//!     .final_reduce(|values: Vec<Bytes>| vec![Bytes::from(values.len().to_string())]);
//!
//! let storage = Arc::new(LocalFileSystem::new("data", vec!["local".to_string()]));
//! let network = Arc::new(GrpcNetwork::new("count", Vec::new()));
//! let tree = mrtree::Engine::new(storage, network, pipeline)
//!     .calculate("input.txt")
//!     .await?;
//! for key in tree.children_keys() {
//!     println!("{:?}", key);
//! }
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;

pub mod chain;
pub mod cmd;
pub mod config;
pub mod engine;
pub mod error;
pub mod network;
pub mod partition;
pub mod storage;
pub mod tree;
pub mod utils;
pub mod worker;
pub mod workload;

pub use chain::{build, ChainBuilder, FinalReduceFunc, MapFunc, Pipeline, ReduceFunc};
pub use engine::Engine;
pub use error::CalculateError;
pub use network::Network;
pub use partition::Partition;
pub use storage::{FileSystem, RecordReader};
pub use tree::ResultTree;

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single mapped record: the key chosen by the map function and the
/// record it was computed from.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyValue {
    /// The key.
    pub key: Bytes,
    /// The value.
    pub value: Bytes,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: Bytes, value: Bytes) -> Self {
        Self { key, value }
    }

    /// Consumes the key-value pair and returns both halves.
    #[inline]
    pub fn into_parts(self) -> (Bytes, Bytes) {
        (self.key, self.value)
    }
}
