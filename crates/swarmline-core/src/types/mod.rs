//! Core type definitions for Swarmline
//!
//! This module contains shared types used across the crate: process
//! configuration and state, and authorization entities/tuples.

mod authz_types;
mod process_types;

pub use authz_types::*;
pub use process_types::*;
