//! Splits a source into contiguous byte ranges, one per node.

use itertools::Itertools;

/// A half-open byte range `[start, end)` of the source assigned to one node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    pub node: String,
    pub start: u64,
    pub end: u64,
}

impl Partition {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Splits `[0, length)` evenly across `node_ids`, in node order.
///
/// Boundary `i` sits at `length * i / n`, so consecutive ranges differ in
/// size by at most one byte and none is empty when `length >= n`. When
/// there are fewer bytes than nodes the empty ranges are left out, and a
/// zero-length source yields no partitions at all.
pub fn partition(length: u64, node_ids: &[String]) -> Vec<Partition> {
    let n = node_ids.len() as u128;
    if n == 0 || length == 0 {
        return Vec::new();
    }
    // u128 keeps `length * i` from overflowing for sources near u64::MAX.
    let boundary = |i: u128| (u128::from(length) * i / n) as u64;

    (0..=n)
        .map(boundary)
        .tuple_windows()
        .zip(node_ids)
        .map(|((start, end), node)| Partition {
            node: node.clone(),
            start,
            end,
        })
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    fn assert_covers(length: u64, parts: &[Partition]) {
        let mut next = 0;
        for p in parts {
            assert_eq!(p.start, next, "gap or overlap at {next}");
            assert!(p.start < p.end);
            next = p.end;
        }
        assert_eq!(next, length);
    }

    #[test]
    fn single_node_takes_everything() {
        let parts = partition(42, &nodes(1));
        assert_eq!(
            parts,
            vec![Partition {
                node: "1".into(),
                start: 0,
                end: 42
            }]
        );
    }

    #[test]
    fn one_byte_per_node() {
        let parts = partition(3, &nodes(3));
        let ranges: Vec<_> = parts.iter().map(|p| (p.node.as_str(), p.start, p.end)).collect();
        assert_eq!(ranges, vec![("1", 0, 1), ("2", 1, 2), ("3", 2, 3)]);
    }

    #[test]
    fn covers_every_length_exactly_once() {
        for k in 1..=7 {
            for length in 1..=50 {
                let parts = partition(length, &nodes(k));
                assert_covers(length, &parts);
                if length >= k as u64 {
                    assert_eq!(parts.len(), k);
                    let sizes = parts.iter().map(Partition::len).minmax().into_option();
                    let (min, max) = sizes.expect("partitions");
                    assert!(max - min <= 1);
                }
            }
        }
    }

    #[test]
    fn fewer_bytes_than_nodes_drops_empty_ranges() {
        let parts = partition(2, &nodes(5));
        assert_eq!(parts.len(), 2);
        assert_covers(2, &parts);
    }

    #[test]
    fn empty_source_or_no_nodes() {
        assert!(partition(0, &nodes(3)).is_empty());
        assert!(partition(10, &[]).is_empty());
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let parts = partition(u64::MAX, &nodes(3));
        assert_covers(u64::MAX, &parts);
    }
}
