//! Merges the keyed output of every partition into groups.

use bytes::Bytes;
use fnv::FnvHashMap;

use crate::KeyValue;

/// Values grouped by exact key bytes.
pub type Groups = FnvHashMap<Bytes, Vec<Bytes>>;

/// Groups `outputs`, which must be indexed by partition.
///
/// Partitions are merged in index order, so every group lists its values by
/// partition first and by record order within a partition second.
pub fn group(outputs: Vec<Vec<KeyValue>>) -> Groups {
    let mut groups = Groups::default();
    for kv in outputs.into_iter().flatten() {
        let (key, value) = kv.into_parts();
        groups.entry(key).or_default().push(value);
    }
    groups
}
