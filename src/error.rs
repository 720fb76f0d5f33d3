//! Errors returned by [`Engine::calculate`](crate::Engine::calculate).

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

/// The reduction stage a degenerate group was detected in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// The reduce stage at this index in the chain.
    Reduce(usize),
    FinalReduce,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reduce(index) => write!(f, "reduce stage {}", index),
            Stage::FinalReduce => f.write_str("final reduce"),
        }
    }
}

/// Every way a calculation can fail. No partial result accompanies any of
/// them.
#[derive(Error, Debug)]
pub enum CalculateError {
    /// The storage collaborator could not report its nodes.
    #[error("failed to resolve node topology: {0:#}")]
    Topology(#[source] anyhow::Error),

    /// The storage collaborator reported no nodes at all.
    #[error("no compute nodes available")]
    NoNodes,

    /// The length of the named resource could not be determined.
    #[error("failed to get length of `{name}`: {source:#}")]
    Length {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Opening or reading a partition's record stream failed.
    #[error("failed to read partition [{start}, {end}) on node `{node}`: {source:#}")]
    Read {
        node: String,
        start: u64,
        end: u64,
        #[source]
        source: anyhow::Error,
    },

    /// A remote node could not run a partition.
    #[error("failed to dispatch partition [{start}, {end}) to node `{node}`: {source:#}")]
    Dispatch {
        node: String,
        start: u64,
        end: u64,
        #[source]
        source: anyhow::Error,
    },

    /// A reduce or final reduce function returned no values for a group.
    #[error("{stage} returned no values for key {}", String::from_utf8_lossy(.key))]
    Degenerate { key: Bytes, stage: Stage },

    /// A partition or reduce task panicked.
    #[error("task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}
