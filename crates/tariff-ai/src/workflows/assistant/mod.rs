//! Seam for the external conversational AI collaborator. The dialogue router
//! only decides *when* to defer to it and forwards the raw message text; the
//! transport lives behind [`AssistantClient`] so tests can script replies.

mod http;

pub use http::PollingAssistantClient;

use async_trait::async_trait;

#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Forward free text the billing rules could not answer and wait for the
    /// collaborator's reply.
    async fn submit(&self, text: &str) -> Result<String, AssistantError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("assistant reply not ready after {attempts} polls")]
    PollBudgetExhausted { attempts: u32 },
    #[error("assistant returned an unexpected payload: {0}")]
    MalformedReply(String),
    #[error("no assistant endpoint is configured")]
    Disabled,
}

/// Stand-in used when `ASSISTANT_BASE_URL` is unset. Every submission fails
/// with [`AssistantError::Disabled`], which the router turns into a canned
/// out-of-scope reply.
pub struct DisabledAssistant;

#[async_trait]
impl AssistantClient for DisabledAssistant {
    async fn submit(&self, _text: &str) -> Result<String, AssistantError> {
        Err(AssistantError::Disabled)
    }
}
