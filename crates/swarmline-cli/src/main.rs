//! Swarmline command line interface
//!
//! Runs agent-network processes under the log bridge and manages
//! authorization for agent networks.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{authorize, networks, openfga, run};

#[derive(Parser, Debug)]
#[command(name = "swarmline", version, about = "Agent-network process tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a process (or a set of processes) under the log bridge
    Run(run::RunArgs),
    /// Grant or revoke agent-network access for users
    Authorize(authorize::AuthorizeArgs),
    /// List enabled agent networks from the manifest
    Networks(networks::NetworksArgs),
    /// Manage the OpenFGA server container
    Openfga(openfga::OpenFgaArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Run(args) => run::run(args).await?,
        Command::Authorize(args) => authorize::run(args).await?,
        Command::Networks(args) => networks::run(args).await?,
        Command::Openfga(args) => openfga::run(args).await?,
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_trailing_command() {
        let cli = Cli::try_parse_from([
            "swarmline", "run", "--name", "server", "--logs", "logs", "--",
            "python", "-m", "agent_server",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Run(_)));
    }

    #[test]
    fn test_parse_authorize_revoke() {
        let cli = Cli::try_parse_from([
            "swarmline", "authorize", "--user", "alice bob", "--network", "hello_world",
            "--revoke",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Authorize(_)));
    }

    #[test]
    fn test_parse_openfga_up() {
        let cli =
            Cli::try_parse_from(["swarmline", "openfga", "--http-port", "18080", "up"]).unwrap();
        assert!(matches!(cli.command, Command::Openfga(_)));
    }

    #[test]
    fn test_run_rejects_config_with_command() {
        let result = Cli::try_parse_from([
            "swarmline", "run", "--config", "procs.json", "--", "echo", "hi",
        ]);
        assert!(result.is_err());
    }
}
