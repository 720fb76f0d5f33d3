//! The keyed tree a calculation returns.

use std::collections::BTreeMap;

use bytes::Bytes;
use itertools::Either;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One node of a result tree.
///
/// The root of every calculation is an [`ResultTree::Internal`] node keyed by
/// the map keys; each child is a [`ResultTree::Leaf`] holding the value its
/// group converged to. Trees are immutable and can be shared across threads.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResultTree {
    Internal(BTreeMap<Bytes, ResultTree>),
    Leaf(Bytes),
}

impl ResultTree {
    /// Builds a root whose children are the given keys, each holding a leaf.
    pub fn from_leaves(leaves: impl IntoIterator<Item = (Bytes, Bytes)>) -> Self {
        ResultTree::Internal(
            leaves
                .into_iter()
                .map(|(key, value)| (key, ResultTree::Leaf(value)))
                .collect(),
        )
    }

    /// The value of a leaf, or [`None`] for an internal node.
    pub fn leaf(&self) -> Option<&Bytes> {
        match self {
            ResultTree::Leaf(value) => Some(value),
            ResultTree::Internal(_) => None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, ResultTree::Leaf(_))
    }

    /// Keys of this node's children in byte order. Empty for a leaf.
    pub fn children_keys(&self) -> impl Iterator<Item = &Bytes> + '_ {
        match self {
            ResultTree::Internal(children) => Either::Left(children.keys()),
            ResultTree::Leaf(_) => Either::Right(std::iter::empty()),
        }
    }

    /// The child under `key`, if this is an internal node that has one.
    pub fn child(&self, key: &[u8]) -> Option<&ResultTree> {
        match self {
            ResultTree::Internal(children) => children.get(key),
            ResultTree::Leaf(_) => None,
        }
    }

    /// Number of children; zero for a leaf.
    pub fn len(&self) -> usize {
        match self {
            ResultTree::Internal(children) => children.len(),
            ResultTree::Leaf(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Internal nodes serialize as maps and leaves as strings. Keys and values
/// that are not valid UTF-8 are converted lossily.
impl Serialize for ResultTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResultTree::Leaf(value) => serializer.serialize_str(&String::from_utf8_lossy(value)),
            ResultTree::Internal(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(&String::from_utf8_lossy(key), child)?;
                }
                map.end()
            }
        }
    }
}
