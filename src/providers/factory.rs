use crate::config::{Config, ProviderKind};
use crate::core::catalog::ModelCatalog;
use crate::core::error::ChatError;
use crate::providers::{ResponseProvider, echo::EchoProvider, simulated::SimulatedProvider};
use std::collections::HashMap;
use std::sync::Arc;

type ProviderCreator = Box<
    dyn Fn(&Config, Arc<ModelCatalog>) -> Result<Arc<dyn ResponseProvider>, ChatError>
        + Send
        + Sync,
>;

pub struct ProviderFactory {
    creators: HashMap<ProviderKind, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();

        creators.insert(
            ProviderKind::Simulated,
            Box::new(|config: &Config, catalog: Arc<ModelCatalog>| {
                let provider = SimulatedProvider::new(
                    catalog,
                    config.simulated_delay(),
                    config.fallback_name.clone(),
                );
                Ok(Arc::new(provider) as Arc<dyn ResponseProvider>)
            }) as ProviderCreator,
        );

        creators.insert(
            ProviderKind::Echo,
            Box::new(|_config: &Config, _catalog: Arc<ModelCatalog>| {
                Ok(Arc::new(EchoProvider) as Arc<dyn ResponseProvider>)
            }) as ProviderCreator,
        );

        Self { creators }
    }

    pub fn create(
        &self,
        kind: &ProviderKind,
        config: &Config,
        catalog: Arc<ModelCatalog>,
    ) -> Result<Arc<dyn ResponseProvider>, ChatError> {
        self.creators
            .get(kind)
            .ok_or_else(|| ChatError::Config(format!("Provider not found: {:?}", kind)))
            .and_then(|creator| creator(config, catalog))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_every_kind() {
        let factory = ProviderFactory::new();
        let catalog = Arc::new(ModelCatalog::builtin());
        let config = Config::default();

        let simulated = factory
            .create(&ProviderKind::Simulated, &config, catalog.clone())
            .unwrap();
        assert_eq!(simulated.name(), "simulated");

        let echo = factory.create(&ProviderKind::Echo, &config, catalog).unwrap();
        assert_eq!(echo.name(), "echo");
    }
}
