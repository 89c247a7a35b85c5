//! `swarmline run` - spawn processes under the log bridge

use anyhow::{bail, Context};
use clap::Args;
use std::path::PathBuf;
use swarmline_core::{default_log_dir, ObservePlugin, ProcessConfig, ProcessRunner, Renderer};
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Name used as console prefix and mirror file stem
    /// (defaults to the command's file stem)
    #[arg(long)]
    name: Option<String>,

    /// Extra environment variables, KEY=VALUE
    #[arg(long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Working directory for the process
    #[arg(long)]
    cwd: Option<String>,

    /// Directory for per-process mirror files
    /// (defaults to the platform-local swarmline/logs dir)
    #[arg(long = "logs", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Disable raw-line mirroring entirely
    #[arg(long, conflicts_with = "log_dir")]
    no_logs: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// JSON file with an array of process configurations to run together
    #[arg(long, conflicts_with_all = ["name", "env", "cwd", "command"])]
    config: Option<PathBuf>,

    /// Command and arguments to run
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    // Observability config propagates to the spawned processes via env
    let mut observe = ObservePlugin::from_env();
    observe.initialize();
    observe.set_environment_variables();

    let renderer = Renderer::new().with_color(!args.no_color);
    let mut runner = ProcessRunner::new().with_renderer(renderer);

    let log_dir = if args.no_logs {
        None
    } else {
        Some(args.log_dir.clone().unwrap_or_else(default_log_dir))
    };

    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let configs: Vec<ProcessConfig> = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        if configs.is_empty() {
            bail!("no processes defined in {}", path.display());
        }

        for mut config in configs {
            if config.log_dir.is_none() {
                config.log_dir = log_dir.clone();
            }
            runner.add(config)?;
        }
        let names: Vec<String> = runner.list().iter().map(|s| s.config.name.clone()).collect();
        for name in &names {
            runner.start(name)?;
        }

        let interrupted = tokio::select! {
            _ = tokio::signal::ctrl_c() => true,
            result = runner.wait_all() => {
                result?;
                false
            }
        };
        if interrupted {
            info!("Interrupted, stopping all processes");
            runner.stop_all().await?;
        }
        return Ok(0);
    }

    let Some((command, cmd_args)) = args.command.split_first() else {
        bail!("no command given; pass a command or --config");
    };

    let name = match &args.name {
        Some(name) => name.clone(),
        None => std::path::Path::new(command)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(command)
            .to_string(),
    };

    let mut config = ProcessConfig::new(&name, command).with_args(cmd_args.to_vec());
    for pair in &args.env {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid --env '{}', expected KEY=VALUE", pair);
        };
        config = config.with_env(key, value);
    }
    if let Some(cwd) = &args.cwd {
        config = config.with_cwd(cwd);
    }
    if let Some(dir) = &log_dir {
        config = config.with_log_dir(dir);
    }

    runner.add(config)?;
    runner.start(&name)?;

    let interrupted = tokio::select! {
        _ = tokio::signal::ctrl_c() => true,
        result = runner.wait(&name) => {
            return Ok(result?);
        }
    };
    if interrupted {
        info!("Interrupted, stopping {}", name);
        runner.stop_all().await?;
    }
    Ok(130)
}
