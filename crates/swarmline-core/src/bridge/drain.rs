//! Stream draining tasks
//!
//! One fire-and-forget task per subprocess stream reads lines until the pipe
//! closes, feeding the assemble -> classify -> render/mirror pipeline. The
//! tasks also keep the child from deadlocking on a full pipe.

use super::assemble::JsonAssembler;
use super::mirror::LogMirror;
use super::record::{classify, LogRecord, StreamKind};
use super::render::Renderer;
use crate::error::{BridgeError, Error, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Handles to the drain tasks of one process
pub struct OutputBridge {
    stdout_task: JoinHandle<()>,
    stderr_task: JoinHandle<()>,
}

impl OutputBridge {
    /// Take the child's stdout/stderr pipes and start draining them.
    ///
    /// `log_dir` enables raw-line mirroring to `<log_dir>/<name>.log`;
    /// `records` optionally receives every classified record.
    pub fn attach(
        child: &mut Child,
        name: &str,
        log_dir: Option<&Path>,
        renderer: Renderer,
        records: Option<mpsc::Sender<LogRecord>>,
    ) -> Result<Self> {
        let stdout = child.stdout.take().ok_or_else(|| {
            Error::Bridge(BridgeError::StreamNotCaptured("stdout".to_string()))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            Error::Bridge(BridgeError::StreamNotCaptured("stderr".to_string()))
        })?;

        let mirror = match log_dir {
            Some(dir) => Some(Arc::new(LogMirror::open(dir, name)?)),
            None => None,
        };

        let stdout_task = tokio::spawn(drain_stream(
            stdout,
            name.to_string(),
            StreamKind::Stdout,
            mirror.clone(),
            renderer.clone(),
            records.clone(),
        ));
        let stderr_task = tokio::spawn(drain_stream(
            stderr,
            name.to_string(),
            StreamKind::Stderr,
            mirror,
            renderer,
            records,
        ));

        Ok(Self {
            stdout_task,
            stderr_task,
        })
    }

    /// Wait for both streams to close (the child exiting closes them)
    pub async fn wait(self) {
        let _ = self.stdout_task.await;
        let _ = self.stderr_task.await;
    }
}

/// Drain one stream to completion.
///
/// Every raw line reaches the mirror, but blank text lines produce no
/// console record and are not forwarded to the record sink.
pub async fn drain_stream<R>(
    stream: R,
    source: String,
    kind: StreamKind,
    mirror: Option<Arc<LogMirror>>,
    renderer: Renderer,
    records: Option<mpsc::Sender<LogRecord>>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut assembler = JsonAssembler::new();
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("{} {:?} closed", source, kind);
                break;
            }
            Ok(_) => {
                let raw = line.trim_end_matches(['\n', '\r']);
                if let Some(mirror) = &mirror {
                    mirror.append(raw);
                }
                for payload in assembler.push(raw) {
                    emit(&source, kind, payload, &renderer, &records).await;
                }
            }
            Err(e) => {
                error!("Error reading {} {:?}: {}", source, kind, e);
                break;
            }
        }
    }

    // Partial document left in the assembler degrades to text
    for payload in assembler.finish() {
        emit(&source, kind, payload, &renderer, &records).await;
    }
}

async fn emit(
    source: &str,
    kind: StreamKind,
    payload: super::assemble::Payload,
    renderer: &Renderer,
    records: &Option<mpsc::Sender<LogRecord>>,
) {
    // Blank lines are mirrored but not worth a console record
    if let super::assemble::Payload::Text(text) = &payload {
        if text.trim().is_empty() {
            return;
        }
    }

    let record = classify(source, kind, payload);
    println!("{}", renderer.render(&record));
    if let Some(tx) = records {
        // A gone consumer must not stop the drain
        let _ = tx.send(record).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::severity::Severity;
    use std::io::Cursor;

    async fn drain_bytes(data: &str, kind: StreamKind) -> Vec<LogRecord> {
        let (tx, mut rx) = mpsc::channel(64);
        drain_stream(
            Cursor::new(data.as_bytes().to_vec()),
            "test".to_string(),
            kind,
            None,
            Renderer::plain(),
            Some(tx),
        )
        .await;

        let mut out = Vec::new();
        while let Ok(record) = rx.try_recv() {
            out.push(record);
        }
        out
    }

    #[tokio::test]
    async fn test_drain_plain_lines() {
        let records = drain_bytes("one\ntwo\n", StreamKind::Stdout).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "one");
        assert_eq!(records[1].message, "two");
    }

    #[tokio::test]
    async fn test_drain_multiline_json_is_one_record() {
        let data = "before\n{\n  \"message\": \"hello\",\n  \"level\": \"error\"\n}\nafter\n";
        let records = drain_bytes(data, StreamKind::Stdout).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].message, "hello");
        assert_eq!(records[1].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_drain_flushes_partial_document_at_eof() {
        let data = "{\n  \"message\": \"never closed\"\n";
        let records = drain_bytes(data, StreamKind::Stdout).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "{");
    }

    #[tokio::test]
    async fn test_drain_skips_blank_lines() {
        let records = drain_bytes("one\n\n   \ntwo\n", StreamKind::Stdout).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "one");
        assert_eq!(records[1].message, "two");
    }

    #[tokio::test]
    async fn test_drain_strips_crlf() {
        let records = drain_bytes("windows line\r\n", StreamKind::Stdout).await;
        assert_eq!(records[0].message, "windows line");
    }

    #[tokio::test]
    async fn test_drain_mirrors_raw_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = Arc::new(LogMirror::open(dir.path(), "test").unwrap());
        let data = "plain\n\n{\n  \"a\": 1\n}\n";

        drain_stream(
            Cursor::new(data.as_bytes().to_vec()),
            "test".to_string(),
            StreamKind::Stdout,
            Some(mirror.clone()),
            Renderer::plain(),
            None,
        )
        .await;

        // The mirror carries every raw line, blanks and JSON fragments included
        let contents = std::fs::read_to_string(mirror.path()).unwrap();
        assert_eq!(contents, "plain\n\n{\n  \"a\": 1\n}\n");
    }
}
