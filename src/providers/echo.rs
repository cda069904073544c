use super::ResponseProvider;
use crate::core::error::ChatError;
use std::collections::BTreeSet;

/// Answers immediately with the user's own text
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

#[async_trait::async_trait]
impl ResponseProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn request(
        &self,
        _model_id: &str,
        text: &str,
        _active_connectors: &BTreeSet<String>,
    ) -> Result<String, ChatError> {
        Ok(text.to_string())
    }
}
