use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::TariffConfig;
use crate::workflows::assistant::{AssistantClient, AssistantError};
use crate::workflows::billing::dialog::DialogRouter;
use crate::workflows::billing::session::{InMemorySessionStore, SessionKey};

/// Assistant double that records every forwarded text and returns a fixed
/// reply, so dispatch tests can assert exactly what crossed the seam.
pub(super) struct ScriptedAssistant {
    reply: String,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAssistant {
    pub(super) fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl AssistantClient for ScriptedAssistant {
    async fn submit(&self, text: &str) -> Result<String, AssistantError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(text.to_string());
        Ok(self.reply.clone())
    }
}

/// Assistant double that always fails at the transport level.
pub(super) struct BrokenAssistant;

#[async_trait]
impl AssistantClient for BrokenAssistant {
    async fn submit(&self, _text: &str) -> Result<String, AssistantError> {
        Err(AssistantError::PollBudgetExhausted { attempts: 3 })
    }
}

pub(super) fn relaxed_policy() -> TariffConfig {
    TariffConfig {
        require_year: false,
        default_year: 2025,
    }
}

pub(super) fn strict_policy() -> TariffConfig {
    TariffConfig {
        require_year: true,
        default_year: 2025,
    }
}

pub(super) fn router<A: AssistantClient>(
    assistant: Arc<A>,
    policy: TariffConfig,
) -> DialogRouter<InMemorySessionStore, A> {
    let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(60), 64));
    DialogRouter::new(store, assistant, policy)
}

pub(super) fn session() -> SessionKey {
    SessionKey::from("test-session")
}
