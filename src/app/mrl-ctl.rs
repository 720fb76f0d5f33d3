use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mrtree::cmd::ctl::Args;
use mrtree::config::ClusterConfig;
use mrtree::network::grpc::GrpcNetwork;
use mrtree::{utils, workload, Engine, ResultTree};
use tracing::debug;

fn display_tree(tree: &ResultTree) {
    if tree.is_empty() {
        println!("No keys in result");
        return;
    }
    for key in tree.children_keys() {
        let value = tree.child(key).and_then(ResultTree::leaf);
        let key =
            utils::string_from_bytes(key.clone()).unwrap_or_else(|_| format!("{:?}", key));
        match value {
            Some(value) => {
                let value = utils::string_from_bytes(value.clone())
                    .unwrap_or_else(|_| format!("{:?}", value));
                println!("{}\t{}", key, value);
            }
            None => println!("{}\t<subtree>", key),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_logging(args.cluster.log_level());

    let config = ClusterConfig::resolve(
        args.cluster.config.as_deref(),
        args.nodes,
        args.cluster.root.clone(),
    )?;
    debug!(?config.nodes, "resolved cluster");

    let pipeline = workload::named(&args.workload, &args.args)?;
    let storage = config.storage();
    let network = Arc::new(GrpcNetwork::new(args.workload.clone(), args.args.clone()));

    let tree = Engine::new(storage, network, pipeline)
        .calculate(&args.input)
        .await
        .with_context(|| format!("Calculation over `{}` failed", args.input))?;

    if args.table {
        display_tree(&tree);
    } else {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    }
    Ok(())
}
