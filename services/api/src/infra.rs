use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tariff_ai::config::AppConfig;
use tariff_ai::error::AppError;
use tariff_ai::workflows::assistant::{AssistantClient, DisabledAssistant, PollingAssistantClient};
use tariff_ai::workflows::billing::{
    ConsumerCategory, DialogRouter, InMemorySessionStore, SewagePercent,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The dialogue service wired with the in-memory session store and whichever
/// assistant transport the configuration selects.
pub(crate) type ChatService = DialogRouter<InMemorySessionStore, dyn AssistantClient>;

pub(crate) fn build_chat_service(config: &AppConfig) -> Result<Arc<ChatService>, AppError> {
    let store = Arc::new(InMemorySessionStore::new(
        config.session.ttl,
        config.session.capacity,
    ));

    let assistant: Arc<dyn AssistantClient> = match &config.assistant {
        Some(assistant_config) => Arc::new(PollingAssistantClient::new(assistant_config)?),
        None => Arc::new(DisabledAssistant),
    };

    Ok(Arc::new(DialogRouter::new(store, assistant, config.tariff)))
}

pub(crate) fn parse_category(raw: &str) -> Result<ConsumerCategory, String> {
    raw.parse::<ConsumerCategory>().map_err(|err| {
        format!(
            "{err}; expected one of: {}",
            ConsumerCategory::ALL
                .iter()
                .map(|category| category.label())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

pub(crate) fn parse_percent(raw: &str) -> Result<SewagePercent, String> {
    raw.trim()
        .trim_end_matches('%')
        .parse::<u32>()
        .ok()
        .and_then(SewagePercent::from_number)
        .ok_or_else(|| format!("'{raw}' is not a supported surcharge; use 80, 90 or 100"))
}
