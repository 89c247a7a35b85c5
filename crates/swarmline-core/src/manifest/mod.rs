//! Agent-network manifest
//!
//! A manifest is a JSON object mapping network definition files to an
//! enabled flag, e.g. `{"hello_world.json": true, "old_demo.json": false}`.
//! Network names are the file stems of enabled entries.

use crate::error::{Error, ManifestError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Env var naming the manifest file, mirroring the runtime's convention
pub const MANIFEST_FILE_ENV: &str = "AGENT_MANIFEST_FILE";

/// A loaded agent-network manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: BTreeMap<String, bool>,
}

impl Manifest {
    /// Load a manifest from an explicit path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Manifest(ManifestError::NotFound(path.display().to_string()))
            } else {
                Error::Io(e)
            }
        })?;

        let entries: BTreeMap<String, bool> = serde_json::from_str(&text).map_err(|e| {
            Error::Manifest(ManifestError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        debug!("Loaded manifest {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Load the manifest named by `AGENT_MANIFEST_FILE`
    pub fn from_env() -> Result<Self> {
        match std::env::var(MANIFEST_FILE_ENV) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Err(Error::Manifest(ManifestError::NotConfigured)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of enabled networks: file stems of enabled entries, sorted
    pub fn network_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(file, _)| stem(file))
            .collect()
    }

    /// Whether a network is present and enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(file, enabled)| *enabled && stem(file) == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn stem(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
        .to_string()
}
