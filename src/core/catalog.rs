use crate::core::error::ChatError;
use crate::core::usage::Capability;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chat,
    Code,
    Orchestration,
    Vision,
}

impl Category {
    /// Display order used by model pickers
    pub const ALL: [Category; 4] = [
        Category::Chat,
        Category::Code,
        Category::Orchestration,
        Category::Vision,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Chat => "chat",
            Category::Code => "code",
            Category::Orchestration => "orchestration",
            Category::Vision => "vision",
        }
    }

    /// Usage capability charged when a model of this category is dispatched
    pub fn capability(&self) -> Capability {
        match self {
            Category::Chat => Capability::Reasoning,
            Category::Code => Capability::CodeGen,
            Category::Vision => Capability::ImageGen,
            Category::Orchestration => Capability::Orchestration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Standard,
    Premium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub display_name: String,
    pub category: Category,
    pub tier: Tier,
}

impl Model {
    pub fn new(id: &str, display_name: &str, category: Category, tier: Tier) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            category,
            tier,
        }
    }
}

/// Read-only registry of the models a turn can be dispatched to.
///
/// Models keep their registration order inside each category so pickers
/// render a stable list.
#[derive(Debug, Default, Clone)]
pub struct ModelCatalog {
    models: Vec<Model>,
    index: HashMap<String, usize>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the models the client ships with
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let defaults = [
            ("claude-4-opus-code", "Claude 4 Opus Code", Category::Code, Tier::Premium),
            ("claude-4-sonnet-code", "Claude 4 Sonnet Code", Category::Code, Tier::Standard),
            ("gpt-4-turbo-code", "GPT-4 Turbo Code", Category::Code, Tier::Premium),
            ("claude-4-sonnet", "Claude 4 Sonnet", Category::Chat, Tier::Standard),
            ("claude-4-opus", "Claude 4 Opus", Category::Chat, Tier::Premium),
            ("gpt-4-turbo", "GPT-4 Turbo", Category::Chat, Tier::Premium),
            ("claude-4-orchestrator", "Claude 4 Orchestrator", Category::Orchestration, Tier::Premium),
            ("meta-llama-orchestrator", "Meta Llama Orchestrator", Category::Orchestration, Tier::Standard),
            ("claude-4-vision", "Claude 4 Vision", Category::Vision, Tier::Premium),
            ("gpt-4-vision", "GPT-4 Vision", Category::Vision, Tier::Premium),
        ];
        for (id, name, category, tier) in defaults {
            catalog.models.push(Model::new(id, name, category, tier));
            catalog.index.insert(id.to_string(), catalog.models.len() - 1);
        }
        catalog
    }

    pub fn register(&mut self, model: Model) -> Result<(), ChatError> {
        if self.index.contains_key(&model.id) {
            return Err(ChatError::DuplicateModel(model.id));
        }
        self.index.insert(model.id.clone(), self.models.len());
        self.models.push(model);
        Ok(())
    }

    pub fn resolve(&self, model_id: &str) -> Result<&Model, ChatError> {
        self.index
            .get(model_id)
            .map(|&i| &self.models[i])
            .ok_or_else(|| ChatError::ModelNotFound(model_id.to_string()))
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.index.contains_key(model_id)
    }

    pub fn list_by_category(&self, category: Category) -> Vec<&Model> {
        self.models
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Name to show for `model_id`, or `fallback` when it is not registered
    pub fn display_name<'a>(&'a self, model_id: &str, fallback: &'a str) -> &'a str {
        self.resolve(model_id)
            .map(|m| m.display_name.as_str())
            .unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_unique() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.index.len(), catalog.len());
    }

    #[test]
    fn resolve_known_and_unknown() {
        let catalog = ModelCatalog::builtin();
        let model = catalog.resolve("claude-4-sonnet").unwrap();
        assert_eq!(model.display_name, "Claude 4 Sonnet");
        assert_eq!(model.category, Category::Chat);
        assert_eq!(model.tier, Tier::Standard);

        match catalog.resolve("nope") {
            Err(ChatError::ModelNotFound(id)) => assert_eq!(id, "nope"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn list_by_category_keeps_registration_order() {
        let catalog = ModelCatalog::builtin();
        let ids: Vec<&str> = catalog
            .list_by_category(Category::Code)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["claude-4-opus-code", "claude-4-sonnet-code", "gpt-4-turbo-code"]
        );
    }

    #[test]
    fn register_rejects_duplicate_across_categories() {
        let mut catalog = ModelCatalog::builtin();
        let dup = Model::new("gpt-4-vision", "Other", Category::Chat, Tier::Standard);
        assert!(matches!(
            catalog.register(dup),
            Err(ChatError::DuplicateModel(_))
        ));

        let fresh = Model::new("local-llm", "Local", Category::Chat, Tier::Standard);
        catalog.register(fresh).unwrap();
        assert_eq!(
            catalog.list_by_category(Category::Chat).last().unwrap().id,
            "local-llm"
        );
    }

    #[test]
    fn display_name_falls_back() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.display_name("gpt-4-turbo", "?"), "GPT-4 Turbo");
        assert_eq!(catalog.display_name("retired", "Claude 4 Sonnet"), "Claude 4 Sonnet");
    }
}
