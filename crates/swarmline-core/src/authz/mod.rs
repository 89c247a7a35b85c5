//! Relationship-based authorization
//!
//! This module handles:
//! - The `Authorizer` trait (grant/revoke/check)
//! - The OpenFGA-backed implementation (external server)
//! - Environment-driven configuration and factory construction

mod authorizer;
mod config;
mod factory;
mod openfga;

pub use authorizer::Authorizer;
pub use config::{
    AuthzConfig, ACTOR_KEY_ENV, ALLOW_ACTION_ENV, AUTHORIZER_ENV, AUTHORIZER_STORE_ENV,
    AUTHORIZER_URL_ENV, RESOURCE_KEY_ENV,
};
pub use factory::AuthorizerFactory;
pub use openfga::OpenFgaAuthorizer;
