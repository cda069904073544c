use crate::config::{Config, SearchPolicy};
use crate::core::catalog::{Category, ModelCatalog};
use crate::core::connectors::{ConnectorRegistry, WEB_CONNECTOR};
use crate::core::error::{ChatError, ValidationError};
use crate::core::session::{Sender, SessionLog, Turn};
use crate::core::usage::{Capability, UsageCounters};
use crate::providers::ResponseProvider;
use chrono::Local;
use futures::FutureExt;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    AwaitingResponse,
    Completed,
    Cancelled,
}

/// Outcome of one provider call, tagged with the user turn it answers
#[derive(Debug)]
pub struct Completion {
    pub correlation_id: u64,
    pub outcome: Result<String, ChatError>,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub default_model: String,
    pub fallback_name: String,
    pub search_policy: SearchPolicy,
    pub response_timeout: Option<Duration>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_model: config.default_model.clone(),
            fallback_name: config.fallback_name.clone(),
            search_policy: config.search_policy,
            response_timeout: config.response_timeout(),
        }
    }
}

struct PendingRequest {
    model_id: String,
    state: RequestState,
    task: Option<JoinHandle<()>>,
}

/// Owns the transcript and usage counters, sends user turns to the response
/// provider and pairs every reply with the turn that asked for it.
///
/// Any number of requests may be outstanding. Each provider call runs on
/// its own task and reports back over a channel; completions are applied
/// one at a time by whoever drives [`DispatchController::next_completion`].
pub struct DispatchController {
    catalog: Arc<ModelCatalog>,
    connectors: ConnectorRegistry,
    usage: UsageCounters,
    session: SessionLog,
    provider: Arc<dyn ResponseProvider>,
    settings: DispatchSettings,
    pending: HashMap<u64, PendingRequest>,
    cancelled: HashSet<u64>,
    next_id: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl DispatchController {
    pub fn new(
        catalog: Arc<ModelCatalog>,
        connectors: ConnectorRegistry,
        usage: UsageCounters,
        provider: Arc<dyn ResponseProvider>,
        settings: DispatchSettings,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            connectors,
            usage,
            session: SessionLog::new(),
            provider,
            settings,
            pending: HashMap::new(),
            cancelled: HashSet::new(),
            next_id: 1,
            completions_tx,
            completions_rx,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn connectors(&self) -> &ConnectorRegistry {
        &self.connectors
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub fn usage(&self) -> &UsageCounters {
        &self.usage
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn toggle_connector(&mut self, connector_id: &str) -> Result<bool, ChatError> {
        self.connectors.toggle(connector_id)
    }

    /// Catalog name for `model_id`, or the configured placeholder
    pub fn display_name(&self, model_id: &str) -> &str {
        self.catalog
            .display_name(model_id, &self.settings.fallback_name)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Model that actually serves a request for `model_id`
    fn effective_model(&self, model_id: &str) -> (String, Category) {
        match self.catalog.resolve(model_id) {
            Ok(model) => (model.id.clone(), model.category),
            Err(err) => {
                tracing::warn!(%err, default = %self.settings.default_model, "falling back to default model");
                let category = self
                    .catalog
                    .resolve(&self.settings.default_model)
                    .map(|m| m.category)
                    .unwrap_or(Category::Chat);
                (self.settings.default_model.clone(), category)
            }
        }
    }

    fn charge_usage(&mut self, category: Category) {
        self.usage.increment(category.capability());
        let search = match self.settings.search_policy {
            SearchPolicy::WebConnector => self.connectors.is_active(WEB_CONNECTOR),
            SearchPolicy::Always => true,
            SearchPolicy::Never => false,
        };
        if search {
            self.usage.increment(Capability::SuperSearch);
        }
    }

    /// Appends a user turn and hands it to the response provider.
    ///
    /// Returns the new turn's id, which is also the correlation id of the
    /// reply. The user turn is in the session log when this returns. Must be
    /// called from within a tokio runtime.
    pub fn send_message(&mut self, raw_text: &str, model_id: &str) -> Result<u64, ChatError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let (effective_model, category) = self.effective_model(model_id);
        let id = self.allocate_id();
        self.session.append(Turn {
            id,
            text: text.to_string(),
            sender: Sender::User,
            model_id: model_id.to_string(),
            created_at: Local::now(),
            correlation_id: id,
            failed: false,
        });
        self.charge_usage(category);
        self.pending.insert(
            id,
            PendingRequest {
                model_id: model_id.to_string(),
                state: RequestState::Pending,
                task: None,
            },
        );

        let provider = Arc::clone(&self.provider);
        let completions = self.completions_tx.clone();
        let limit = self.settings.response_timeout;
        let connectors = self.connectors.active_set();
        let text = text.to_string();
        let task = tokio::spawn(async move {
            // a panicking provider still owes the session a reply
            let call = AssertUnwindSafe(provider.request(&effective_model, &text, &connectors))
                .catch_unwind()
                .map(|result| result.unwrap_or_else(|panic| Err(panic_failure(panic))));
            let outcome = match limit {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or_else(|_| Err(ChatError::ProviderTimeout(limit))),
                None => call.await,
            };
            let _ = completions.send(Completion {
                correlation_id: id,
                outcome,
            });
        });

        if let Some(entry) = self.pending.get_mut(&id) {
            entry.state = RequestState::AwaitingResponse;
            entry.task = Some(task);
        }
        tracing::debug!(id, model = model_id, "message dispatched");
        Ok(id)
    }

    /// Records a provider completion.
    ///
    /// Returns the appended assistant turn, or `None` when the completion
    /// belongs to a cancelled or unknown request and was dropped.
    pub fn apply_completion(&mut self, completion: Completion) -> Option<Turn> {
        let Completion {
            correlation_id,
            outcome,
        } = completion;

        let entry = match self.pending.remove(&correlation_id) {
            Some(entry) => entry,
            None if self.cancelled.contains(&correlation_id) => {
                tracing::debug!(id = correlation_id, "late completion for cancelled request dropped");
                return None;
            }
            None => {
                tracing::debug!(id = correlation_id, "completion for unknown request dropped");
                return None;
            }
        };

        let (text, failed) = match outcome {
            Ok(reply) => (reply, false),
            Err(err) => {
                tracing::warn!(id = correlation_id, %err, "provider failed");
                (err.to_string(), true)
            }
        };
        let id = self.allocate_id();
        let turn = self.session.append(Turn {
            id,
            text,
            sender: Sender::Assistant,
            model_id: entry.model_id,
            created_at: Local::now(),
            correlation_id,
            failed,
        });
        tracing::debug!(id = correlation_id, failed, "request completed");
        Some(turn.clone())
    }

    /// Waits for the next reply and appends it.
    ///
    /// Returns `None` once no request is awaiting a response.
    pub async fn next_completion(&mut self) -> Option<Turn> {
        while self.has_outstanding() {
            let completion = self.completions_rx.recv().await?;
            if let Some(turn) = self.apply_completion(completion) {
                return Some(turn);
            }
        }
        None
    }

    /// Applies every completion that has already arrived without waiting
    pub fn drain_ready(&mut self) -> Vec<Turn> {
        let mut turns = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            turns.extend(self.apply_completion(completion));
        }
        turns
    }

    /// Stops waiting on `correlation_id`; a reply arriving later is discarded
    pub fn cancel(&mut self, correlation_id: u64) -> Result<(), ChatError> {
        let entry = self
            .pending
            .remove(&correlation_id)
            .ok_or(ChatError::UnknownRequest(correlation_id))?;
        if let Some(task) = entry.task {
            task.abort();
        }
        self.cancelled.insert(correlation_id);
        tracing::info!(id = correlation_id, "request cancelled");
        Ok(())
    }

    pub fn request_state(&self, correlation_id: u64) -> Option<RequestState> {
        if let Some(entry) = self.pending.get(&correlation_id) {
            return Some(entry.state);
        }
        if self.cancelled.contains(&correlation_id) {
            return Some(RequestState::Cancelled);
        }
        self.session
            .reply_to(correlation_id)
            .map(|_| RequestState::Completed)
    }

    /// Correlation ids still waiting on the provider, oldest first
    pub fn in_flight(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.pending.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn has_outstanding(&self) -> bool {
        !self.pending.is_empty()
    }
}

fn panic_failure(panic: Box<dyn Any + Send>) -> ChatError {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ChatError::ProviderFailure(format!("provider panicked: {}", message))
}

impl Drop for DispatchController {
    fn drop(&mut self) {
        for entry in self.pending.values_mut() {
            if let Some(task) = entry.task.take() {
                task.abort();
            }
        }
    }
}
