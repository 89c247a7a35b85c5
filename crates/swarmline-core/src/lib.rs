//! Swarmline Core Library
//!
//! This crate provides the core functionality for Swarmline, including:
//! - The process log bridge (drain, classify, render, mirror)
//! - Process lifecycle management
//! - Agent-network manifest handling
//! - Relationship-based authorization (OpenFGA)
//! - OpenFGA container helper and observability plugin
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     swarmline-core                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  bridge/       - Stream drain, JSON assembly, rendering     │
//! │  runner/       - Process configuration and lifecycle        │
//! │  manifest/     - Agent-network manifest                     │
//! │  authz/        - Authorizer trait, OpenFGA client           │
//! │  container/    - OpenFGA container helper                   │
//! │  observe/      - Observability plugin                       │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod authz;
pub mod bridge;
pub mod container;
pub mod error;
pub mod manifest;
pub mod observe;
pub mod runner;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

// Re-export bridge components
pub use bridge::{
    drain_stream, JsonAssembler, LogMirror, LogRecord, OutputBridge, Payload, Renderer, Severity,
    StreamKind,
};

// Re-export process runner
pub use runner::{default_log_dir, ProcessRunner};

// Re-export manifest
pub use manifest::{Manifest, MANIFEST_FILE_ENV};

// Re-export authorization components
pub use authz::{Authorizer, AuthorizerFactory, AuthzConfig, OpenFgaAuthorizer};

// Re-export container helper and observability plugin
pub use container::{OpenFgaContainer, OpenFgaPorts};
pub use observe::{ObserveConfig, ObservePlugin};
