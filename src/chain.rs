//! Pipeline chains: the user functions a calculation is made of.
//!
//! A chain is started with [`build`], extended with any number of
//! [`ChainBuilder::reduce`] stages and closed with
//! [`ChainBuilder::final_reduce`], which yields an immutable [`Pipeline`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

/// A map function inspects one record and returns the key to group it
/// under, or [`None`] to drop the record.
pub type MapFunc = Arc<dyn Fn(&[u8]) -> Option<Bytes> + Send + Sync>;

/// A reduce function turns one group's values into a new list of values.
/// It is applied once per group per stage.
pub type ReduceFunc = Arc<dyn Fn(Vec<Bytes>) -> Vec<Bytes> + Send + Sync>;

/// A final reduce function is applied to its own output until that output
/// holds exactly one value.
///
/// It must eventually shrink its input to a single value; a function that
/// never does keeps the calculation running forever.
pub type FinalReduceFunc = Arc<dyn Fn(Vec<Bytes>) -> Vec<Bytes> + Send + Sync>;

/// Starts a chain with the given map function.
pub fn build<F>(map: F) -> ChainBuilder
where
    F: Fn(&[u8]) -> Option<Bytes> + Send + Sync + 'static,
{
    ChainBuilder {
        map: Arc::new(map),
        reducers: Vec::new(),
    }
}

/// An unfinished chain. Only [`ChainBuilder::final_reduce`] produces
/// something the engine can run.
#[must_use = "a chain does nothing until it is finished with `final_reduce`"]
pub struct ChainBuilder {
    map: MapFunc,
    reducers: Vec<ReduceFunc>,
}

impl ChainBuilder {
    /// Appends a reduce stage. Stages run in the order they are added.
    pub fn reduce<F>(mut self, reduce: F) -> Self
    where
        F: Fn(Vec<Bytes>) -> Vec<Bytes> + Send + Sync + 'static,
    {
        self.reducers.push(Arc::new(reduce));
        self
    }

    /// Terminates the chain.
    pub fn final_reduce<F>(self, final_reduce: F) -> Pipeline
    where
        F: Fn(Vec<Bytes>) -> Vec<Bytes> + Send + Sync + 'static,
    {
        Pipeline {
            map: self.map,
            reducers: self.reducers.into(),
            final_reduce: Arc::new(final_reduce),
        }
    }
}

/// A finished chain. Cloning is cheap; every clone shares the same functions.
#[derive(Clone)]
pub struct Pipeline {
    map: MapFunc,
    reducers: Arc<[ReduceFunc]>,
    final_reduce: FinalReduceFunc,
}

impl Pipeline {
    #[inline]
    pub fn map(&self) -> &MapFunc {
        &self.map
    }

    #[inline]
    pub fn reducers(&self) -> &[ReduceFunc] {
        &self.reducers
    }

    #[inline]
    pub fn final_reduce(&self) -> &FinalReduceFunc {
        &self.final_reduce
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("reduce_stages", &self.reducers.len())
            .finish_non_exhaustive()
    }
}
