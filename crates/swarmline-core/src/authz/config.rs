//! Authorization configuration from the environment

/// Env var selecting the authorizer implementation
pub const AUTHORIZER_ENV: &str = "AGENT_AUTHORIZER";
/// Env var for the authorization server base URL
pub const AUTHORIZER_URL_ENV: &str = "AGENT_AUTHORIZER_URL";
/// Env var for the store name
pub const AUTHORIZER_STORE_ENV: &str = "AGENT_AUTHORIZER_STORE";
/// Env var with space-separated relations to grant/revoke
pub const ALLOW_ACTION_ENV: &str = "AGENT_AUTHORIZER_ALLOW_ACTION";
/// Env var for the resource type name
pub const RESOURCE_KEY_ENV: &str = "AGENT_AUTHORIZER_RESOURCE_KEY";
/// Env var for the actor type name
pub const ACTOR_KEY_ENV: &str = "AGENT_AUTHORIZER_ACTOR_KEY";

/// Authorization settings, all overridable via environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzConfig {
    /// Implementation selector (`openfga` is the only built-in)
    pub implementation: String,
    pub api_url: String,
    pub store_name: String,
    /// Relations granted or revoked by default
    pub relations: Vec<String>,
    pub resource_type: String,
    pub actor_type: String,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            implementation: "openfga".to_string(),
            api_url: "http://localhost:8080".to_string(),
            store_name: "agent-networks".to_string(),
            relations: vec!["read".to_string()],
            resource_type: "AgentNetwork".to_string(),
            actor_type: "User".to_string(),
        }
    }
}

impl AuthzConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or empty
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            implementation: env_or(AUTHORIZER_ENV, &defaults.implementation),
            api_url: env_or(AUTHORIZER_URL_ENV, &defaults.api_url),
            store_name: env_or(AUTHORIZER_STORE_ENV, &defaults.store_name),
            relations: env_or(ALLOW_ACTION_ENV, "read")
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            resource_type: env_or(RESOURCE_KEY_ENV, &defaults.resource_type),
            actor_type: env_or(ACTOR_KEY_ENV, &defaults.actor_type),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
