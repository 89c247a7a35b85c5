//! Authorizer trait

use crate::error::Result;
use crate::types::Entity;
use async_trait::async_trait;

/// Relationship-based authorization backend.
///
/// `grant` and `revoke` return whether the call changed anything; a tuple
/// that already existed (or was already absent) is not a failure.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Grant `relation` for `actor` on `resource`
    async fn grant(&self, actor: &Entity, relation: &str, resource: &Entity) -> Result<bool>;

    /// Revoke `relation` for `actor` on `resource`
    async fn revoke(&self, actor: &Entity, relation: &str, resource: &Entity) -> Result<bool>;

    /// Check whether `actor` has `relation` on `resource`
    async fn check(&self, actor: &Entity, relation: &str, resource: &Entity) -> Result<bool>;
}
