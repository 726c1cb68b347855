use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AssistantClient, AssistantError};
use crate::config::AssistantConfig;

/// HTTP client for the completion service. Submission creates a job; the
/// reply is then fetched by polling the job status with a fixed delay, a
/// bounded attempt count, and a per-request timeout, so a stalled
/// collaborator can never wedge a session.
pub struct PollingAssistantClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
    poll_attempts: u32,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitAccepted {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct CompletionStatus {
    status: String,
    #[serde(default)]
    reply: Option<String>,
}

impl PollingAssistantClient {
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            poll_interval: config.poll_interval,
            poll_attempts: config.poll_attempts.max(1),
        })
    }
}

#[async_trait]
impl AssistantClient for PollingAssistantClient {
    async fn submit(&self, text: &str) -> Result<String, AssistantError> {
        let accepted: SubmitAccepted = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .json(&SubmitRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        for attempt in 1..=self.poll_attempts {
            let status: CompletionStatus = self
                .client
                .get(format!("{}/v1/completions/{}", self.base_url, accepted.job_id))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match status.status.as_str() {
                "done" | "completed" => {
                    return status.reply.ok_or_else(|| {
                        AssistantError::MalformedReply("completed job carried no reply".to_string())
                    });
                }
                "failed" => {
                    return Err(AssistantError::MalformedReply(format!(
                        "job {} reported failure",
                        accepted.job_id
                    )));
                }
                _ => {
                    if attempt < self.poll_attempts {
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
            }
        }

        Err(AssistantError::PollBudgetExhausted {
            attempts: self.poll_attempts,
        })
    }
}
