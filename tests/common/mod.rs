//! In-memory storage and network doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use bytes::Bytes;
use mrtree::engine::map::map_partition;
use mrtree::{FileSystem, KeyValue, Network, Partition, Pipeline, RecordReader};

/// What one record stream yields, in order.
#[derive(Clone, Debug)]
pub enum Step {
    Record(&'static str),
    Fail(&'static str),
    /// Sleeps before moving on to the next step.
    Delay(Duration),
    /// Never yields; the reader sets the flag when it is dropped.
    Hang(Arc<AtomicBool>),
}

pub struct MockReader {
    steps: VecDeque<Step>,
    dropped: Option<Arc<AtomicBool>>,
}

#[async_trait]
impl RecordReader for MockReader {
    async fn read(&mut self) -> Result<Option<Bytes>> {
        while let Some(Step::Delay(delay)) = self.steps.front() {
            tokio::time::sleep(*delay).await;
            self.steps.pop_front();
        }
        match self.steps.pop_front() {
            Some(Step::Record(data)) => Ok(Some(Bytes::from_static(data.as_bytes()))),
            Some(Step::Fail(msg)) => Err(anyhow!(msg)),
            Some(Step::Hang(flag)) => {
                self.dropped = Some(flag);
                std::future::pending().await
            }
            Some(Step::Delay(_)) | None => Ok(None),
        }
    }
}

impl Drop for MockReader {
    fn drop(&mut self) {
        if let Some(flag) = &self.dropped {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

/// A storage double. Streams are scripted per partition start offset; a
/// start without a script yields an empty stream.
#[derive(Default)]
pub struct MockFileSystem {
    nodes: Option<Vec<String>>,
    length: Option<u64>,
    open_error: Option<&'static str>,
    scripts: Mutex<HashMap<u64, Vec<Step>>>,
    reads: Mutex<Vec<(String, u64, u64)>>,
}

impl MockFileSystem {
    /// One node and one stream yielding `records`, with the source length
    /// equal to the record count.
    pub fn single(records: &[&'static str]) -> Self {
        Self::default()
            .with_nodes(&["some-id"])
            .with_length(records.len() as u64)
            .with_stream(0, records.iter().map(|r| Step::Record(*r)).collect())
    }

    pub fn with_nodes(mut self, nodes: &[&str]) -> Self {
        self.nodes = Some(nodes.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_stream(self, start: u64, steps: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().insert(start, steps);
        self
    }

    pub fn failing_open(mut self, msg: &'static str) -> Self {
        self.open_error = Some(msg);
        self
    }

    /// Every `read_file` call as `(name, start, end)`, in call order.
    pub fn reads(&self) -> Vec<(String, u64, u64)> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn nodes(&self) -> Result<Vec<String>> {
        self.nodes.clone().ok_or_else(|| anyhow!("some-topology-error"))
    }

    async fn length(&self, _name: &str) -> Result<u64> {
        self.length.ok_or_else(|| anyhow!("some-error"))
    }

    async fn read_file(&self, name: &str, start: u64, end: u64) -> Result<Box<dyn RecordReader>> {
        self.reads.lock().unwrap().push((name.to_string(), start, end));
        if let Some(msg) = self.open_error {
            bail!(msg);
        }
        let steps = self.scripts.lock().unwrap().remove(&start).unwrap_or_default();
        Ok(Box::new(MockReader {
            steps: steps.into(),
            dropped: None,
        }))
    }
}

/// A network that must never be used.
#[derive(Default)]
pub struct UnusedNetwork {
    calls: Mutex<Vec<Partition>>,
}

impl UnusedNetwork {
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Network for UnusedNetwork {
    async fn map_partition(&self, _name: &str, partition: &Partition) -> Result<Vec<KeyValue>> {
        self.calls.lock().unwrap().push(partition.clone());
        bail!("network used for partition on {}", partition.node)
    }
}

/// Runs every partition against shared storage, as if each node were a
/// worker reading the same source. Nodes listed in `failing` refuse work.
pub struct LoopbackNetwork {
    storage: Arc<dyn FileSystem>,
    pipeline: Pipeline,
    failing: Vec<String>,
    calls: Mutex<Vec<Partition>>,
}

impl LoopbackNetwork {
    pub fn new(storage: Arc<dyn FileSystem>, pipeline: Pipeline) -> Self {
        Self {
            storage,
            pipeline,
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, node: &str) -> Self {
        self.failing.push(node.to_string());
        self
    }

    /// Nodes that received work, sorted.
    pub fn nodes_called(&self) -> Vec<String> {
        let mut nodes: Vec<_> = self.calls.lock().unwrap().iter().map(|p| p.node.clone()).collect();
        nodes.sort();
        nodes
    }
}

#[async_trait]
impl Network for LoopbackNetwork {
    async fn map_partition(&self, name: &str, partition: &Partition) -> Result<Vec<KeyValue>> {
        self.calls.lock().unwrap().push(partition.clone());
        if self.failing.contains(&partition.node) {
            bail!("node {} unreachable", partition.node);
        }
        Ok(map_partition(self.storage.clone(), name, partition, &self.pipeline).await?)
    }
}

pub fn bytes(raw: &[&'static str]) -> Vec<Bytes> {
    raw.iter().map(|v| Bytes::from_static(v.as_bytes())).collect()
}
