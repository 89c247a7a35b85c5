//! Authorizer construction from configuration

use super::authorizer::Authorizer;
use super::config::AuthzConfig;
use super::openfga::OpenFgaAuthorizer;
use crate::error::{AuthzError, Error, Result};
use tracing::info;

/// Builds the configured authorizer implementation
pub struct AuthorizerFactory;

impl AuthorizerFactory {
    /// Build from an explicit configuration
    pub fn create(config: AuthzConfig) -> Result<Box<dyn Authorizer>> {
        match config.implementation.as_str() {
            "openfga" => {
                info!("Using OpenFGA authorizer at {}", config.api_url);
                Ok(Box::new(OpenFgaAuthorizer::new(config)))
            }
            other => Err(Error::Authz(AuthzError::UnknownImplementation(
                other.to_string(),
            ))),
        }
    }

    /// Build from `AGENT_AUTHORIZER*` environment variables
    pub fn from_env() -> Result<Box<dyn Authorizer>> {
        Self::create(AuthzConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openfga() {
        let result = AuthorizerFactory::create(AuthzConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_implementation() {
        let config = AuthzConfig {
            implementation: "zanzibar-at-home".to_string(),
            ..AuthzConfig::default()
        };
        let result = AuthorizerFactory::create(config);
        assert!(matches!(
            result,
            Err(Error::Authz(AuthzError::UnknownImplementation(_)))
        ));
    }
}
