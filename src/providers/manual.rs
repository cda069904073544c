use super::ResponseProvider;
use crate::core::error::ChatError;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Reply = Result<String, ChatError>;

/// Provider whose replies are released by the test, one request at a time
/// and in any order. Requests are keyed by their text.
#[derive(Clone, Default)]
pub struct ManualProvider {
    waiting: Arc<Mutex<HashMap<String, oneshot::Sender<Reply>>>>,
    calls: Arc<Mutex<Vec<(String, String, BTreeSet<String>)>>>,
}

impl ManualProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completes the request whose text is `text`, waiting for it to arrive first
    pub async fn resolve(&self, text: &str, reply: Reply) {
        loop {
            let sender = self.waiting.lock().unwrap().remove(text);
            if let Some(sender) = sender {
                let _ = sender.send(reply);
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    /// Waits until a request with `text` has reached the provider
    pub async fn wait_for(&self, text: &str) {
        while !self.waiting.lock().unwrap().contains_key(text) {
            tokio::task::yield_now().await;
        }
    }

    /// Whether the caller gave up on the pending request for `text`
    pub fn abandoned(&self, text: &str) -> bool {
        self.waiting
            .lock()
            .unwrap()
            .get(text)
            .is_some_and(|sender| sender.is_closed())
    }

    pub async fn reply(&self, text: &str, answer: &str) {
        self.resolve(text, Ok(answer.to_string())).await
    }

    /// `(model_id, text, active_connectors)` of every request received so far
    pub fn calls(&self) -> Vec<(String, String, BTreeSet<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ResponseProvider for ManualProvider {
    fn name(&self) -> &str {
        "manual"
    }

    async fn request(
        &self,
        model_id: &str,
        text: &str,
        active_connectors: &BTreeSet<String>,
    ) -> Result<String, ChatError> {
        let (tx, rx) = oneshot::channel();
        self.waiting.lock().unwrap().insert(text.to_string(), tx);
        self.calls.lock().unwrap().push((
            model_id.to_string(),
            text.to_string(),
            active_connectors.clone(),
        ));
        rx.await
            .map_err(|_| ChatError::ProviderFailure("reply dropped".to_string()))?
    }
}
