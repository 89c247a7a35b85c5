//! Observability plugin
//!
//! Manages env-driven configuration for an external tracing backend:
//! enable/disable flags, API keys, host and project metadata. Initialization
//! is idempotent and never fails the host process; a misconfigured plugin
//! just stays inactive.

use std::collections::HashMap;
use tracing::{info, warn};

pub const ENABLED_ENV: &str = "OBSERVE_ENABLED";
pub const USE_EXISTING_ENV: &str = "OBSERVE_USE_EXISTING";
pub const SECRET_KEY_ENV: &str = "OBSERVE_SECRET_KEY";
pub const PUBLIC_KEY_ENV: &str = "OBSERVE_PUBLIC_KEY";
pub const HOST_ENV: &str = "OBSERVE_HOST";
pub const PROJECT_ENV: &str = "OBSERVE_PROJECT";
pub const RELEASE_ENV: &str = "OBSERVE_RELEASE";
pub const DEBUG_ENV: &str = "OBSERVE_DEBUG";
pub const SAMPLE_RATE_ENV: &str = "OBSERVE_SAMPLE_RATE";

/// Observability backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveConfig {
    pub enabled: bool,
    /// Attach to an already-configured backend instead of setting one up
    pub use_existing: bool,
    pub secret_key: String,
    pub public_key: String,
    pub host: String,
    pub project: String,
    pub release: String,
    pub debug: bool,
    pub sample_rate: f64,
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            use_existing: false,
            secret_key: String::new(),
            public_key: String::new(),
            host: "http://localhost:3000".to_string(),
            project: "default".to_string(),
            release: "dev".to_string(),
            debug: false,
            sample_rate: 1.0,
        }
    }
}

impl ObserveConfig {
    /// Read the configuration from `OBSERVE_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: bool_env(ENABLED_ENV, defaults.enabled),
            use_existing: bool_env(USE_EXISTING_ENV, defaults.use_existing),
            secret_key: std::env::var(SECRET_KEY_ENV).unwrap_or_default(),
            public_key: std::env::var(PUBLIC_KEY_ENV).unwrap_or_default(),
            host: string_env(HOST_ENV, &defaults.host),
            project: string_env(PROJECT_ENV, &defaults.project),
            release: string_env(RELEASE_ENV, &defaults.release),
            debug: bool_env(DEBUG_ENV, defaults.debug),
            sample_rate: std::env::var(SAMPLE_RATE_ENV)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sample_rate),
        }
    }

    pub fn has_keys(&self) -> bool {
        !self.secret_key.is_empty() && !self.public_key.is_empty()
    }

    /// Render the configuration as env var pairs. Key vars are only included
    /// when non-empty so existing values are never clobbered with blanks.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut vars = HashMap::from([
            (ENABLED_ENV.to_string(), self.enabled.to_string()),
            (USE_EXISTING_ENV.to_string(), self.use_existing.to_string()),
            (HOST_ENV.to_string(), self.host.clone()),
            (PROJECT_ENV.to_string(), self.project.clone()),
            (RELEASE_ENV.to_string(), self.release.clone()),
            (DEBUG_ENV.to_string(), self.debug.to_string()),
            (SAMPLE_RATE_ENV.to_string(), self.sample_rate.to_string()),
        ]);
        if !self.secret_key.is_empty() {
            vars.insert(SECRET_KEY_ENV.to_string(), self.secret_key.clone());
        }
        if !self.public_key.is_empty() {
            vars.insert(PUBLIC_KEY_ENV.to_string(), self.public_key.clone());
        }
        vars
    }
}

/// Process-local plugin state
pub struct ObservePlugin {
    config: ObserveConfig,
    initialized: bool,
}

impl ObservePlugin {
    pub fn new(config: ObserveConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ObserveConfig::from_env())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &ObserveConfig {
        &self.config
    }

    /// Activate the plugin if enabled and fully configured. Idempotent; a
    /// second call is a no-op.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        if !self.config.enabled {
            info!("Observability disabled, skipping");
            return;
        }
        if !self.config.has_keys() {
            warn!(
                "Observability enabled but keys missing: set {} and {}",
                SECRET_KEY_ENV, PUBLIC_KEY_ENV
            );
            return;
        }
        if self.config.use_existing {
            info!("Using existing observability backend at {}", self.config.host);
            self.initialized = true;
            return;
        }

        info!(
            "Observability active: host={} project={} release={} sample_rate={}",
            self.config.host, self.config.project, self.config.release, self.config.sample_rate
        );
        self.initialized = true;
    }

    /// Export the configuration into the process environment for subprocesses
    pub fn set_environment_variables(&self) {
        for (key, value) in self.config.to_env() {
            std::env::set_var(key, value);
        }
    }

    /// Flush pending traces. A hook for backends with buffered exporters.
    pub fn flush(&self) {
        if self.initialized {
            info!("Flushed pending traces");
        }
    }

    /// Flush and deactivate
    pub fn shutdown(&mut self) {
        if self.initialized {
            self.flush();
            self.initialized = false;
            info!("Observability shut down");
        }
    }
}

fn bool_env(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn string_env(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_plugin_stays_inactive() {
        let mut plugin = ObservePlugin::new(ObserveConfig::default());
        plugin.initialize();
        assert!(!plugin.is_initialized());
    }

    #[test]
    fn test_enabled_without_keys_stays_inactive() {
        let mut plugin = ObservePlugin::new(ObserveConfig {
            enabled: true,
            ..ObserveConfig::default()
        });
        plugin.initialize();
        assert!(!plugin.is_initialized());
    }

    #[test]
    fn test_initialize_idempotent() {
        let mut plugin = ObservePlugin::new(ObserveConfig {
            enabled: true,
            secret_key: "sk".to_string(),
            public_key: "pk".to_string(),
            ..ObserveConfig::default()
        });
        plugin.initialize();
        assert!(plugin.is_initialized());
        plugin.initialize();
        assert!(plugin.is_initialized());
    }

    #[test]
    fn test_use_existing_short_circuit() {
        let mut plugin = ObservePlugin::new(ObserveConfig {
            enabled: true,
            use_existing: true,
            secret_key: "sk".to_string(),
            public_key: "pk".to_string(),
            ..ObserveConfig::default()
        });
        plugin.initialize();
        assert!(plugin.is_initialized());
    }

    #[test]
    fn test_shutdown_resets() {
        let mut plugin = ObservePlugin::new(ObserveConfig {
            enabled: true,
            secret_key: "sk".to_string(),
            public_key: "pk".to_string(),
            ..ObserveConfig::default()
        });
        plugin.initialize();
        plugin.shutdown();
        assert!(!plugin.is_initialized());
    }

    #[test]
    fn test_to_env_skips_empty_keys() {
        let vars = ObserveConfig::default().to_env();
        assert!(!vars.contains_key(SECRET_KEY_ENV));
        assert!(!vars.contains_key(PUBLIC_KEY_ENV));
        assert_eq!(vars.get(ENABLED_ENV).map(String::as_str), Some("false"));
        assert_eq!(vars.get(SAMPLE_RATE_ENV).map(String::as_str), Some("1"));
    }
}
