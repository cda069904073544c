use crate::core::error::ChatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub display_name: String,
    pub active: bool,
}

/// Id of the connector that gates super-search usage
pub const WEB_CONNECTOR: &str = "web";

/// Capability connectors and their activation state
#[derive(Debug, Clone, Default)]
pub struct ConnectorRegistry {
    connectors: Vec<Connector>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("filesystem", "Filesystem", true);
        registry.register(WEB_CONNECTOR, "Web Search", true);
        registry.register("database", "Database", true);
        registry.register("vision", "Vision API", false);
        registry.register("audio", "Audio Processing", false);
        registry
    }

    /// Adds a connector; an existing id keeps its entry and only updates `active`
    pub fn register(&mut self, id: &str, display_name: &str, active: bool) {
        match self.connectors.iter_mut().find(|c| c.id == id) {
            Some(existing) => existing.active = active,
            None => self.connectors.push(Connector {
                id: id.to_string(),
                display_name: display_name.to_string(),
                active,
            }),
        }
    }

    /// Flips the connector's membership in the active set and returns the new state
    pub fn toggle(&mut self, connector_id: &str) -> Result<bool, ChatError> {
        let connector = self
            .connectors
            .iter_mut()
            .find(|c| c.id == connector_id)
            .ok_or_else(|| ChatError::UnknownConnector(connector_id.to_string()))?;
        connector.active = !connector.active;
        tracing::debug!(connector = connector_id, active = connector.active, "connector toggled");
        Ok(connector.active)
    }

    pub fn set_active(&mut self, connector_id: &str, active: bool) -> Result<(), ChatError> {
        let connector = self
            .connectors
            .iter_mut()
            .find(|c| c.id == connector_id)
            .ok_or_else(|| ChatError::UnknownConnector(connector_id.to_string()))?;
        connector.active = active;
        Ok(())
    }

    pub fn is_active(&self, connector_id: &str) -> bool {
        self.connectors
            .iter()
            .any(|c| c.id == connector_id && c.active)
    }

    pub fn active_set(&self) -> BTreeSet<String> {
        self.connectors
            .iter()
            .filter(|c| c.active)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn list(&self) -> &[Connector] {
        &self.connectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_activation() {
        let registry = ConnectorRegistry::builtin();
        let active: Vec<String> = registry.active_set().into_iter().collect();
        assert_eq!(active, vec!["database", "filesystem", "web"]);
        assert!(!registry.is_active("audio"));
    }

    #[test]
    fn toggle_web_off_and_on() {
        let mut registry = ConnectorRegistry::builtin();
        assert_eq!(registry.toggle("web").unwrap(), false);
        assert!(!registry.active_set().contains("web"));
        assert_eq!(registry.toggle("web").unwrap(), true);
        assert!(registry.active_set().contains("web"));
    }

    #[test]
    fn toggle_twice_is_involution() {
        for id in ["filesystem", "web", "database", "vision", "audio"] {
            let mut registry = ConnectorRegistry::builtin();
            let before = registry.active_set();
            registry.toggle(id).unwrap();
            assert_ne!(registry.active_set(), before);
            registry.toggle(id).unwrap();
            assert_eq!(registry.active_set(), before);
        }
    }

    #[test]
    fn unknown_connector_leaves_state_untouched() {
        let mut registry = ConnectorRegistry::builtin();
        let before = registry.active_set();
        assert!(matches!(
            registry.toggle("telepathy"),
            Err(ChatError::UnknownConnector(_))
        ));
        assert_eq!(registry.active_set(), before);
    }

    #[test]
    fn register_existing_only_updates_activation() {
        let mut registry = ConnectorRegistry::builtin();
        registry.register("audio", "Renamed", true);
        assert_eq!(registry.list().len(), 5);
        assert!(registry.is_active("audio"));
        assert_eq!(registry.list()[4].display_name, "Audio Processing");
    }
}
