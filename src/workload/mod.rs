//! Converts workload names to pipelines.
//!
//! Controllers and workers build their pipelines from the same
//! `(name, args)` pair, which is what lets a partition's map phase run on a
//! remote node.
//!
//! # Example
//!
//! To get the line-count pipeline:
//! ```
//! # use anyhow::Result;
//! use mrtree::workload;
//! # fn main() -> Result<()> {
//! let count = workload::named("count", &[])?;
//! # Ok(())
//! # }
//! ```

use crate::Pipeline;
use anyhow::{bail, Result};

pub mod count;
pub mod grep;
pub mod longest;

/// Builds the pipeline named `name`.
///
/// Returns [`None`] if no workload with the given name was found or its
/// arguments could not be parsed.
pub fn try_named(name: &str, args: &[String]) -> Option<Pipeline> {
    named(name, args).ok()
}

/// Builds the pipeline named `name`.
///
/// Returns an [`anyhow::Error`] if no workload with the given name was found
/// or its arguments are invalid.
pub fn named(name: &str, args: &[String]) -> Result<Pipeline> {
    match name {
        "count" => Ok(count::pipeline()),
        "grep" => grep::pipeline(args),
        "longest" => Ok(longest::pipeline()),
        _ => bail!("No workload named `{}` found.", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert!(named("count", &[]).is_ok());
        assert!(named("longest", &[]).is_ok());
        assert!(named("grep", &["--term".to_string(), "x".to_string()]).is_ok());
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = named("wc", &[]).unwrap_err();
        assert_eq!(err.to_string(), "No workload named `wc` found.");
        assert!(try_named("wc", &[]).is_none());
    }

    #[test]
    fn grep_requires_a_term() {
        assert!(named("grep", &[]).is_err());
    }
}
