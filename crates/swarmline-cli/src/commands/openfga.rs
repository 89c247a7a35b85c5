//! `swarmline openfga` - manage the OpenFGA server container

use clap::{Args, Subcommand};
use swarmline_core::{OpenFgaContainer, OpenFgaPorts};

#[derive(Args, Debug)]
pub struct OpenFgaArgs {
    #[command(subcommand)]
    command: OpenFgaCommand,

    /// Container image
    #[arg(long, default_value = swarmline_core::container::OPENFGA_IMAGE)]
    image: String,

    /// Host port for the HTTP API
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Host port for the gRPC API
    #[arg(long, default_value_t = 8081)]
    grpc_port: u16,

    /// Host port for the playground UI
    #[arg(long, default_value_t = 3000)]
    playground_port: u16,
}

#[derive(Subcommand, Debug)]
enum OpenFgaCommand {
    /// Pull the container image
    Pull,
    /// Pull and start a detached container
    Up,
    /// Stop the container
    Down,
    /// Show whether the container is running
    Status,
}

pub async fn run(args: OpenFgaArgs) -> anyhow::Result<i32> {
    let container = OpenFgaContainer::new()
        .with_image(&args.image)
        .with_ports(OpenFgaPorts {
            http: args.http_port,
            grpc: args.grpc_port,
            playground: args.playground_port,
        });

    match args.command {
        OpenFgaCommand::Pull => container.pull().await?,
        OpenFgaCommand::Up => {
            container.pull().await?;
            container.up().await?;
            println!(
                "OpenFGA up: http={} grpc={} playground={}",
                args.http_port, args.grpc_port, args.playground_port
            );
        }
        OpenFgaCommand::Down => container.down().await?,
        OpenFgaCommand::Status => {
            if container.status().await? {
                println!("running");
            } else {
                println!("stopped");
                return Ok(1);
            }
        }
    }
    Ok(0)
}
