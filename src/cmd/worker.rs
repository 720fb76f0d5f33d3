use clap::Parser;

use super::ClusterArgs;

#[derive(Parser, Debug)]
#[command(version, about = "Runs map tasks sent by mrl-ctl", long_about = None)]
pub struct Args {
    /// [OPT] Port for the worker to listen on (default 50051)
    #[clap(short = 'P', long, default_value_t = 50051)]
    pub port: u16,
    /// [OPT] Address to bind (default 0.0.0.0)
    #[clap(short, long, default_value = "0.0.0.0")]
    pub bind: String,
    #[command(flatten)]
    pub cluster: ClusterArgs,
}
