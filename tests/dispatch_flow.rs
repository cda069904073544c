use async_trait::async_trait;
use mcpchat::config::{Config, SearchPolicy};
use mcpchat::core::catalog::ModelCatalog;
use mcpchat::core::connectors::ConnectorRegistry;
use mcpchat::core::dispatch::{DispatchController, DispatchSettings, RequestState};
use mcpchat::core::error::ChatError;
use mcpchat::core::session::Sender;
use mcpchat::core::usage::{Capability, UsageCounters};
use mcpchat::providers::ResponseProvider;
use mcpchat::providers::simulated::SimulatedProvider;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Fails any request whose text mentions "fail", echoes everything else
struct FlakyProvider;

#[async_trait]
impl ResponseProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn request(
        &self,
        _model_id: &str,
        text: &str,
        _active_connectors: &BTreeSet<String>,
    ) -> Result<String, ChatError> {
        if text.contains("fail") {
            Err(ChatError::ProviderFailure("upstream refused".to_string()))
        } else {
            Ok(format!("re: {}", text))
        }
    }
}

fn controller(provider: Arc<dyn ResponseProvider>, settings: DispatchSettings) -> DispatchController {
    DispatchController::new(
        Arc::new(ModelCatalog::builtin()),
        ConnectorRegistry::builtin(),
        UsageCounters::new(),
        provider,
        settings,
    )
}

#[tokio::test]
async fn failures_are_inline_and_correctly_paired() {
    let mut controller = controller(Arc::new(FlakyProvider), DispatchSettings::default());

    let ok = controller.send_message("all good", "claude-4-opus").unwrap();
    let bad = controller.send_message("please fail", "gpt-4-turbo-code").unwrap();

    let mut replies = Vec::new();
    while let Some(turn) = controller.next_completion().await {
        replies.push(turn);
    }
    assert_eq!(replies.len(), 2);

    let session = controller.session();
    assert_eq!(session.len(), 4);
    let good = session.reply_to(ok).unwrap();
    assert!(!good.failed);
    assert_eq!(good.text, "re: all good");
    let failed = session.reply_to(bad).unwrap();
    assert!(failed.failed);
    assert_eq!(failed.sender, Sender::Assistant);
    assert_eq!(failed.model_id, "gpt-4-turbo-code");
    assert_eq!(controller.request_state(bad), Some(RequestState::Completed));

    let usage = controller.usage().snapshot();
    assert_eq!(usage[&Capability::Reasoning], 1);
    assert_eq!(usage[&Capability::CodeGen], 1);
    assert_eq!(usage[&Capability::SuperSearch], 2);
}

#[tokio::test(start_paused = true)]
async fn simulated_provider_reply_arrives_after_delay() {
    let catalog = Arc::new(ModelCatalog::builtin());
    let provider = SimulatedProvider::new(
        catalog,
        Duration::from_millis(1000),
        "Claude 4 Sonnet".to_string(),
    );
    let settings = DispatchSettings {
        search_policy: SearchPolicy::Never,
        ..DispatchSettings::from(&Config::default())
    };
    let mut controller = controller(Arc::new(provider), settings);

    let id = controller.send_message("Hello", "claude-4-sonnet").unwrap();
    assert_eq!(controller.session().len(), 1);
    assert!(controller.drain_ready().is_empty());

    let reply = controller.next_completion().await.unwrap();
    assert_eq!(reply.correlation_id, id);
    assert!(reply.text.starts_with("Response generated with Claude 4 Sonnet."));
    assert!(reply.text.contains("database, filesystem, web"));
    assert_eq!(controller.usage().get(Capability::SuperSearch), 0);
}
