//! Command-line arguments of the binaries.

use std::path::PathBuf;

use clap::Args as ClapArgs;

pub mod ctl;
pub mod worker;

/// Where the cluster configuration comes from. Shared by every binary.
#[derive(ClapArgs, Debug, Clone)]
pub struct ClusterArgs {
    /// JSON cluster config (nodes and storage)
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Serve resources from this local directory, overriding the config's storage
    #[clap(short, long)]
    pub root: Option<PathBuf>,
    /// Increase logging verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ClusterArgs {
    /// The `RUST_LOG`-style filter used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
