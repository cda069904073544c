use crate::core::error::ChatError;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Source of assistant replies.
///
/// The controller treats implementations as opaque: transport, retries and
/// latency all belong to the provider.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn request(
        &self,
        model_id: &str,
        text: &str,
        active_connectors: &BTreeSet<String>,
    ) -> Result<String, ChatError>;
}

pub mod echo;
pub mod factory;
pub mod simulated;

#[cfg(test)]
pub mod manual;
