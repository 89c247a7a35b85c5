//! Process log bridge
//!
//! This module handles:
//! - Draining subprocess stdout/stderr until the pipes close
//! - Assembling JSON documents split across multiple lines
//! - Severity inference from structured fields or free-text tokens
//! - Colorized console rendering
//! - Mirroring raw lines to per-process log files

mod assemble;
mod drain;
mod mirror;
mod record;
mod render;
mod severity;

pub use assemble::{JsonAssembler, Payload};
pub use drain::{drain_stream, OutputBridge};
pub use mirror::LogMirror;
pub use record::{classify, LogRecord, StreamKind};
pub use render::Renderer;
pub use severity::Severity;
