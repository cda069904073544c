use super::ResponseProvider;
use crate::core::catalog::ModelCatalog;
use crate::core::error::ChatError;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Stand-in for a remote model: waits a fixed delay, then returns a canned
/// reply naming the model and the connectors that were active.
#[derive(Clone)]
pub struct SimulatedProvider {
    catalog: Arc<ModelCatalog>,
    delay: Duration,
    fallback_name: String,
}

impl SimulatedProvider {
    pub fn new(catalog: Arc<ModelCatalog>, delay: Duration, fallback_name: String) -> Self {
        Self {
            catalog,
            delay,
            fallback_name,
        }
    }

    fn compose(&self, model_id: &str, active_connectors: &BTreeSet<String>) -> String {
        let name = self.catalog.display_name(model_id, &self.fallback_name);
        if active_connectors.is_empty() {
            format!("Response generated with {}. No MCP connectors were active.", name)
        } else {
            let connectors: Vec<&str> = active_connectors.iter().map(String::as_str).collect();
            format!(
                "Response generated with {}. Your message was processed with the active MCP connectors: {}.",
                name,
                connectors.join(", ")
            )
        }
    }
}

#[async_trait::async_trait]
impl ResponseProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn request(
        &self,
        model_id: &str,
        _text: &str,
        active_connectors: &BTreeSet<String>,
    ) -> Result<String, ChatError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.compose(model_id, active_connectors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(delay: Duration) -> SimulatedProvider {
        SimulatedProvider::new(
            Arc::new(ModelCatalog::builtin()),
            delay,
            "Claude 4 Sonnet".to_string(),
        )
    }

    #[tokio::test]
    async fn reply_names_model_and_connectors() {
        let connectors: BTreeSet<String> = ["web", "filesystem"].iter().map(|s| s.to_string()).collect();
        let reply = provider(Duration::ZERO)
            .request("gpt-4-turbo", "hello", &connectors)
            .await
            .unwrap();
        assert!(reply.contains("GPT-4 Turbo"));
        assert!(reply.ends_with("filesystem, web."));
    }

    #[tokio::test]
    async fn unknown_model_uses_fallback_name() {
        let reply = provider(Duration::ZERO)
            .request("retired-model", "hello", &BTreeSet::new())
            .await
            .unwrap();
        assert!(reply.contains("Claude 4 Sonnet"));
        assert!(reply.contains("No MCP connectors"));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_configured_delay() {
        let started = tokio::time::Instant::now();
        provider(Duration::from_millis(1000))
            .request("claude-4-opus", "hello", &BTreeSet::new())
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
