//! OpenFGA-backed authorizer
//!
//! Talks to an OpenFGA server over its HTTP API: resolves the configured
//! store (creating it when absent), ensures an authorization model carrying
//! the configured relations, and issues write/delete/check calls.

use super::authorizer::Authorizer;
use super::config::AuthzConfig;
use crate::error::{AuthzError, Error, Result};
use crate::types::Entity;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Authorizer backed by an external OpenFGA server
pub struct OpenFgaAuthorizer {
    client: reqwest::Client,
    config: AuthzConfig,
    store_id: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct StoreInfo {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ListStoresResponse {
    #[serde(default)]
    stores: Vec<StoreInfo>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    authorization_models: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    allowed: bool,
}

impl OpenFgaAuthorizer {
    pub fn new(config: AuthzConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            store_id: OnceCell::new(),
        }
    }

    /// Tuple key in OpenFGA wire form
    fn tuple_key(&self, actor: &Entity, relation: &str, resource: &Entity) -> Value {
        json!({
            "user": actor.qualified(),
            "relation": relation,
            "object": resource.qualified(),
        })
    }

    /// Authorization model granting the configured relations on the resource
    /// type directly to the actor type
    fn model_body(&self) -> Value {
        let mut relations = serde_json::Map::new();
        let mut metadata = serde_json::Map::new();
        for relation in &self.config.relations {
            relations.insert(relation.clone(), json!({"this": {}}));
            metadata.insert(
                relation.clone(),
                json!({"directly_related_user_types": [{"type": self.config.actor_type}]}),
            );
        }

        json!({
            "schema_version": "1.1",
            "type_definitions": [
                {"type": self.config.actor_type},
                {
                    "type": self.config.resource_type,
                    "relations": relations,
                    "metadata": {"relations": metadata},
                },
            ],
        })
    }

    /// Resolve the store id, creating store and model on first use
    async fn store_id(&self) -> Result<&str> {
        self.store_id
            .get_or_try_init(|| self.resolve_store())
            .await
            .map(String::as_str)
    }

    async fn resolve_store(&self) -> Result<String> {
        let url = format!("{}/stores", self.config.api_url);
        let response = self.client.get(&url).send().await?;
        let listed: ListStoresResponse = Self::parse(response).await?;

        let store_id = match listed
            .stores
            .into_iter()
            .find(|s| s.name == self.config.store_name)
        {
            Some(store) => {
                debug!("Using existing store '{}' ({})", self.config.store_name, store.id);
                store.id
            }
            None => {
                info!("Creating store '{}'", self.config.store_name);
                let response = self
                    .client
                    .post(&url)
                    .json(&json!({"name": self.config.store_name}))
                    .send()
                    .await?;
                let created: StoreInfo = Self::parse(response).await?;
                created.id
            }
        };

        self.ensure_model(&store_id).await?;
        Ok(store_id)
    }

    /// Write the authorization model if the store has none yet
    async fn ensure_model(&self, store_id: &str) -> Result<()> {
        let url = format!(
            "{}/stores/{}/authorization-models",
            self.config.api_url, store_id
        );

        let response = self.client.get(&url).send().await?;
        let models: ListModelsResponse = Self::parse(response).await?;
        if !models.authorization_models.is_empty() {
            return Ok(());
        }

        info!(
            "Writing authorization model for store '{}'",
            self.config.store_name
        );
        let response = self
            .client
            .post(&url)
            .json(&self.model_body())
            .send()
            .await?;
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Authz(AuthzError::InvalidModel(message)));
        }
        Ok(())
    }

    /// Issue a write call with either `writes` or `deletes`. A 400 means the
    /// tuple was already in the requested state.
    async fn write_tuples(&self, operation: &str, tuple: Value) -> Result<bool> {
        let store_id = self.store_id().await?;
        let url = format!("{}/stores/{}/write", self.config.api_url, store_id);
        let body = json!({operation: {"tuple_keys": [tuple]}});

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == reqwest::StatusCode::BAD_REQUEST {
            debug!("Tuple {} was a no-op", operation);
            return Ok(false);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::Authz(AuthzError::Server(format!(
            "{}: {}",
            status, message
        ))))
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Authz(AuthzError::Server(format!(
                "{}: {}",
                status, message
            ))));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Authorizer for OpenFgaAuthorizer {
    async fn grant(&self, actor: &Entity, relation: &str, resource: &Entity) -> Result<bool> {
        self.write_tuples("writes", self.tuple_key(actor, relation, resource))
            .await
    }

    async fn revoke(&self, actor: &Entity, relation: &str, resource: &Entity) -> Result<bool> {
        self.write_tuples("deletes", self.tuple_key(actor, relation, resource))
            .await
    }

    async fn check(&self, actor: &Entity, relation: &str, resource: &Entity) -> Result<bool> {
        let store_id = self.store_id().await?;
        let url = format!("{}/stores/{}/check", self.config.api_url, store_id);
        let body = json!({"tuple_key": self.tuple_key(actor, relation, resource)});

        let response = self.client.post(&url).json(&body).send().await?;
        let checked: CheckResponse = Self::parse(response).await?;
        Ok(checked.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn authorizer() -> OpenFgaAuthorizer {
        OpenFgaAuthorizer::new(AuthzConfig {
            relations: vec!["read".to_string(), "write".to_string()],
            ..AuthzConfig::default()
        })
    }

    #[test]
    fn test_tuple_key_wire_form() {
        let auth = authorizer();
        let key = auth.tuple_key(
            &Entity::new("User", "alice"),
            "read",
            &Entity::new("AgentNetwork", "hello_world"),
        );
        assert_eq!(
            key,
            json!({
                "user": "User:alice",
                "relation": "read",
                "object": "AgentNetwork:hello_world",
            })
        );
    }

    #[test]
    fn test_model_body_covers_all_relations() {
        let auth = authorizer();
        let model = auth.model_body();

        assert_eq!(model["schema_version"], "1.1");
        assert_eq!(model["type_definitions"][0]["type"], "User");

        let resource = &model["type_definitions"][1];
        assert_eq!(resource["type"], "AgentNetwork");
        assert!(resource["relations"].get("read").is_some());
        assert!(resource["relations"].get("write").is_some());
        assert_eq!(
            resource["metadata"]["relations"]["read"]["directly_related_user_types"][0]["type"],
            "User"
        );
    }
}
