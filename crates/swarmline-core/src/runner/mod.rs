//! Process lifecycle management
//!
//! This module handles:
//! - Process configuration and registration
//! - Spawning with piped stdio and an attached log bridge
//! - Status tracking and supervised shutdown

use crate::bridge::{LogRecord, OutputBridge, Renderer};
use crate::error::{Error, Result, RunnerError};
use crate::types::{ProcessConfig, ProcessState, ProcessStatus};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Default mirror directory: `<local data dir>/swarmline/logs`, falling back
/// to `./logs` when the platform dir cannot be resolved
pub fn default_log_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("swarmline").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"))
}

/// A spawned child with its drain tasks
struct RunningProcess {
    child: Child,
    bridge: OutputBridge,
}

/// Manages process lifecycle and state
pub struct ProcessRunner {
    configs: HashMap<String, ProcessConfig>,
    states: HashMap<String, ProcessState>,
    running: HashMap<String, RunningProcess>,
    renderer: Renderer,
    /// Optional sink for every classified record across all processes
    records: Option<mpsc::Sender<LogRecord>>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
            states: HashMap::new(),
            running: HashMap::new(),
            renderer: Renderer::new(),
            records: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_record_sink(mut self, tx: mpsc::Sender<LogRecord>) -> Self {
        self.records = Some(tx);
        self
    }

    /// List all registered processes
    pub fn list(&self) -> Vec<ProcessState> {
        self.states.values().cloned().collect()
    }

    /// Get process state by name
    pub fn get(&self, name: &str) -> Option<&ProcessState> {
        self.states.get(name)
    }

    pub fn get_status(&self, name: &str) -> Option<ProcessStatus> {
        self.states.get(name).map(|s| s.status)
    }

    /// Register a process configuration
    pub fn add(&mut self, config: ProcessConfig) -> Result<()> {
        if config.name.is_empty() || config.command.is_empty() {
            return Err(Error::Runner(RunnerError::InvalidConfig(
                "name and command must be non-empty".to_string(),
            )));
        }
        if self.configs.contains_key(&config.name) {
            return Err(Error::Runner(RunnerError::AlreadyExists(config.name)));
        }

        info!("Adding process: {} ({})", config.name, config.command);

        self.states
            .insert(config.name.clone(), ProcessState::new(config.clone()));
        self.configs.insert(config.name.clone(), config);
        Ok(())
    }

    /// Remove a stopped process
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if !self.configs.contains_key(name) {
            return Err(Error::Runner(RunnerError::NotFound(name.to_string())));
        }
        if self.running.contains_key(name) {
            return Err(Error::Runner(RunnerError::AlreadyRunning(name.to_string())));
        }

        self.configs.remove(name);
        self.states.remove(name);
        Ok(())
    }

    /// Spawn a registered process and attach the log bridge
    pub fn start(&mut self, name: &str) -> Result<()> {
        let config = self
            .configs
            .get(name)
            .ok_or_else(|| Error::Runner(RunnerError::NotFound(name.to_string())))?
            .clone();

        if self.running.contains_key(name) {
            return Err(Error::Runner(RunnerError::AlreadyRunning(name.to_string())));
        }

        info!("Starting process: {} ({})", config.name, config.command);
        if let Some(state) = self.states.get_mut(name) {
            state.status = ProcessStatus::Starting;
            state.error_message = None;
            state.exit_code = None;
        }

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A dropped runner must never orphan the child
            .kill_on_drop(true);
        if let Some(dir) = &config.cwd {
            cmd.current_dir(dir);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                if let Some(state) = self.states.get_mut(name) {
                    state.status = ProcessStatus::Error;
                    state.error_message = Some(e.to_string());
                }
                return Err(Error::Runner(RunnerError::SpawnFailed {
                    name: name.to_string(),
                    message: e.to_string(),
                }));
            }
        };

        let bridge = OutputBridge::attach(
            &mut child,
            &config.name,
            config.log_dir.as_deref(),
            self.renderer.clone(),
            self.records.clone(),
        )?;

        if let Some(state) = self.states.get_mut(name) {
            state.status = ProcessStatus::Running;
            state.pid = child.id();
            state.started_at = Some(chrono::Utc::now());
        }

        debug!("Process running: {} (pid {:?})", name, child.id());
        self.running.insert(name.to_string(), RunningProcess { child, bridge });
        Ok(())
    }

    /// Wait for a running process to exit naturally, draining its streams.
    ///
    /// Cancel-safe: the process stays tracked until its exit status has been
    /// observed, so a caller racing this against a shutdown signal can still
    /// `stop`/`stop_all` the child afterwards.
    pub async fn wait(&mut self, name: &str) -> Result<i32> {
        let proc = self
            .running
            .get_mut(name)
            .ok_or_else(|| Error::Runner(RunnerError::NotRunning(name.to_string())))?;

        let status = proc.child.wait().await?;
        if let Some(proc) = self.running.remove(name) {
            proc.bridge.wait().await;
        }

        // -1 stands in for signal-terminated children
        let code = status.code().unwrap_or(-1);
        self.record_exit(name, code);
        Ok(code)
    }

    /// Wait for every running process to exit naturally
    pub async fn wait_all(&mut self) -> Result<()> {
        let names: Vec<String> = self.running.keys().cloned().collect();
        for name in names {
            self.wait(&name).await?;
        }
        Ok(())
    }

    /// Kill a running process and reap it
    pub async fn stop(&mut self, name: &str) -> Result<()> {
        let mut proc = self
            .running
            .remove(name)
            .ok_or_else(|| Error::Runner(RunnerError::NotRunning(name.to_string())))?;

        info!("Stopping process: {}", name);
        if let Some(state) = self.states.get_mut(name) {
            state.status = ProcessStatus::Stopping;
        }

        if let Err(e) = proc.child.kill().await {
            warn!("Error killing process {}: {}", name, e);
        }
        let status = proc.child.wait().await.map_err(|e| {
            Error::Runner(RunnerError::StopFailed {
                name: name.to_string(),
                message: e.to_string(),
            })
        })?;
        proc.bridge.wait().await;

        self.record_exit(name, status.code().unwrap_or(-1));
        if let Some(state) = self.states.get_mut(name) {
            state.status = ProcessStatus::Stopped;
        }
        Ok(())
    }

    /// Stop every running process
    pub async fn stop_all(&mut self) -> Result<()> {
        let names: Vec<String> = self.running.keys().cloned().collect();
        for name in names {
            if let Err(e) = self.stop(&name).await {
                error!("Error stopping process {}: {}", name, e);
            }
        }
        Ok(())
    }

    /// Names of processes currently running
    pub fn running(&self) -> Vec<&str> {
        self.running.keys().map(String::as_str).collect()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains_key(name)
    }

    fn record_exit(&mut self, name: &str, code: i32) {
        if let Some(state) = self.states.get_mut(name) {
            state.status = ProcessStatus::Exited;
            state.exit_code = Some(code);
            state.finished_at = Some(chrono::Utc::now());
            state.pid = None;
        }
        info!("Process exited: {} (code {})", name, code);
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}
