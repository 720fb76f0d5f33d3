use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use mrtree::cmd::worker::Args;
use mrtree::config::ClusterConfig;
use mrtree::{utils, worker};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_logging(args.cluster.log_level());

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.bind, args.port))?;

    // Workers only read; the node list is the controller's business.
    let config = ClusterConfig::resolve(
        args.cluster.config.as_deref(),
        Vec::new(),
        args.cluster.root.clone(),
    )?;
    worker::serve(addr, config.storage()).await
}
