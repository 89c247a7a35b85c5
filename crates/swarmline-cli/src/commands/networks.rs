//! `swarmline networks` - list enabled agent networks

use clap::Args;
use std::path::PathBuf;
use swarmline_core::Manifest;

#[derive(Args, Debug)]
pub struct NetworksArgs {
    /// Manifest file (defaults to the AGENT_MANIFEST_FILE env var)
    #[arg(long)]
    manifest: Option<PathBuf>,
}

pub async fn run(args: NetworksArgs) -> anyhow::Result<i32> {
    let manifest = match &args.manifest {
        Some(path) => Manifest::load(path)?,
        None => Manifest::from_env()?,
    };

    for name in manifest.network_names() {
        println!("{}", name);
    }
    Ok(0)
}
