//! Authorization entity and tuple types

use serde::{Deserialize, Serialize};

/// A typed entity in the authorization graph (an actor or a resource)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl Entity {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Wire form used by relationship stores, e.g. `User:alice`
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A single relationship tuple: actor has `relation` on resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationTuple {
    pub actor: Entity,
    pub relation: String,
    pub resource: Entity,
}

impl RelationTuple {
    pub fn new(actor: Entity, relation: impl Into<String>, resource: Entity) -> Self {
        Self {
            actor,
            relation: relation.into(),
            resource,
        }
    }
}

impl std::fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} on {}", self.actor, self.relation, self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_qualified() {
        let entity = Entity::new("User", "alice");
        assert_eq!(entity.qualified(), "User:alice");
    }

    #[test]
    fn test_entity_serde_type_key() {
        let entity = Entity::new("AgentNetwork", "hello_world");
        let json = serde_json::to_string(&entity).unwrap();
        assert!(json.contains("\"type\":\"AgentNetwork\""));

        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_tuple_display() {
        let tuple = RelationTuple::new(
            Entity::new("User", "alice"),
            "read",
            Entity::new("AgentNetwork", "airline_policy"),
        );
        assert_eq!(
            tuple.to_string(),
            "User:alice read on AgentNetwork:airline_policy"
        );
    }
}
