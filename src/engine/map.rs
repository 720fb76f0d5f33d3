//! The map phase of one partition: stream its records and key them.

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::spawn_blocking;
use tracing::trace;

use crate::{CalculateError, FileSystem, KeyValue, Partition, Pipeline};

/// Records handed to the map function per blocking task.
const MAP_BATCH: usize = 1024;

/// Streams `partition` of `name` from `storage` through the pipeline's map
/// function.
///
/// Records are mapped in batches on the blocking pool. Rejected records
/// are dropped. The returned values keep the order the records were read
/// in. Any read failure fails the whole partition.
pub async fn map_partition(
    storage: Arc<dyn FileSystem>,
    name: &str,
    partition: &Partition,
    pipeline: &Pipeline,
) -> Result<Vec<KeyValue>, CalculateError> {
    let read_error = |source: anyhow::Error| CalculateError::Read {
        node: partition.node.clone(),
        start: partition.start,
        end: partition.end,
        source,
    };

    let mut records = storage
        .read_file(name, partition.start, partition.end)
        .await
        .map_err(read_error)?;

    let mut mapped = Vec::new();
    let mut batch = Vec::with_capacity(MAP_BATCH);
    let mut seen = 0usize;
    loop {
        let record = records.read().await.map_err(read_error)?;
        let done = record.is_none();
        batch.extend(record);
        if batch.len() == MAP_BATCH || (done && !batch.is_empty()) {
            seen += batch.len();
            mapped.extend(map_batch(pipeline, std::mem::take(&mut batch)).await?);
        }
        if done {
            break;
        }
    }
    trace!(
        node = %partition.node,
        start = partition.start,
        end = partition.end,
        records = seen,
        kept = mapped.len(),
        "mapped partition"
    );
    Ok(mapped)
}

async fn map_batch(
    pipeline: &Pipeline,
    records: Vec<Bytes>,
) -> Result<Vec<KeyValue>, CalculateError> {
    let map_func = pipeline.map().clone();
    let mapped: Vec<KeyValue> = spawn_blocking(move || {
        records
            .into_iter()
            .filter_map(|record| map_func(&record[..]).map(|key| KeyValue::new(key, record)))
            .collect()
    })
    .await?;
    Ok(mapped)
}
