//! Raw line mirroring to per-process log files

use crate::error::{BridgeError, Error, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Appends every raw line of one process to `<log_dir>/<name>.log`
pub struct LogMirror {
    name: String,
    path: PathBuf,
    file: Mutex<File>,
}

impl LogMirror {
    /// Open (creating directories and file as needed) the mirror for `name`
    pub fn open(log_dir: &Path, name: &str) -> Result<Self> {
        let mirror_err = |e: std::io::Error| {
            Error::Bridge(BridgeError::Mirror {
                name: name.to_string(),
                message: e.to_string(),
            })
        };

        std::fs::create_dir_all(log_dir).map_err(mirror_err)?;
        let path = log_dir.join(format!("{}.log", name));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(mirror_err)?;

        Ok(Self {
            name: name.to_string(),
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one raw line. Failures are logged and swallowed so a full disk
    /// never takes the drain down with it.
    pub fn append(&self, line: &str) {
        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "{}", line) {
            warn!("Mirror write failed for '{}': {}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_appends_raw_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LogMirror::open(dir.path(), "server").unwrap();

        mirror.append("first");
        mirror.append(r#"{"json": true}"#);

        let contents = std::fs::read_to_string(mirror.path()).unwrap();
        assert_eq!(contents, "first\n{\"json\": true}\n");
    }

    #[test]
    fn test_mirror_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mirror = LogMirror::open(&nested, "client").unwrap();

        mirror.append("line");
        assert!(nested.join("client.log").exists());
    }

    #[test]
    fn test_mirror_unwritable_dir_is_mirror_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where a directory component should go
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();

        let result = LogMirror::open(&blocker.join("logs"), "server");
        assert!(matches!(
            result,
            Err(Error::Bridge(BridgeError::Mirror { .. }))
        ));
    }

    #[test]
    fn test_mirror_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mirror = LogMirror::open(dir.path(), "server").unwrap();
            mirror.append("one");
        }
        let mirror = LogMirror::open(dir.path(), "server").unwrap();
        mirror.append("two");

        let contents = std::fs::read_to_string(mirror.path()).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }
}
