use clap::Parser;

use super::ClusterArgs;

#[derive(Parser, Debug)]
#[command(version, about = "Runs a calculation and prints its result tree", long_about = None)]
pub struct Args {
    /// Name of the resource to read
    #[arg(short, long)]
    pub input: String,

    /// Name of the workload
    #[arg(short, long)]
    pub workload: String,

    /// Node to split the input across; repeat for more. With a single node,
    /// or none configured, the calculation runs in-process.
    #[arg(short, long = "node")]
    pub nodes: Vec<String>,

    /// Print one `key<TAB>value` line per key instead of JSON
    #[arg(long)]
    pub table: bool,

    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Auxiliary arguments to pass to the workload.
    #[clap(value_parser, last = true)]
    pub args: Vec<String>,
}
