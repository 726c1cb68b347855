use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tariff_ai::config::TariffConfig;
use tariff_ai::workflows::assistant::{AssistantClient, AssistantError};
use tariff_ai::workflows::billing::{
    compute_total, compute_water, ConsumerCategory, DialogRouter, InMemorySessionStore,
    SessionKey, SewagePercent,
};

struct EchoAssistant;

#[async_trait]
impl AssistantClient for EchoAssistant {
    async fn submit(&self, text: &str) -> Result<String, AssistantError> {
        Ok(format!("echo: {text}"))
    }
}

fn service() -> DialogRouter<InMemorySessionStore, EchoAssistant> {
    let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(60), 64));
    DialogRouter::new(
        store,
        Arc::new(EchoAssistant),
        TariffConfig {
            require_year: false,
            default_year: 2025,
        },
    )
}

#[tokio::test]
async fn full_conversation_round_trip() {
    let service = service();
    let customer = SessionKey::from("conversation-1");

    let opening = service
        .resolve(&customer, "hi, how do I pay my bill?")
        .await
        .expect("resolves");
    assert_eq!(opening, "echo: hi, how do I pay my bill?");

    let computed = service
        .resolve(&customer, "15 m3 residential")
        .await
        .expect("resolves");
    assert!(computed.contains("80, 90 or 100%"), "{computed}");

    let total = service.resolve(&customer, "90").await.expect("resolves");

    let water = compute_water(15, ConsumerCategory::Residential, 2025).expect("computes");
    let breakdown = compute_total(water, SewagePercent::Ninety);
    assert_eq!(breakdown.total, Decimal::new(16_369, 2));
    assert!(
        total.contains(&format!("Total: R$ {}", breakdown.total)),
        "{total}"
    );

    // Pending state was consumed by the follow-up.
    let reset = service.resolve(&customer, "90").await.expect("resolves");
    assert!(reset.contains("consumption and category"), "{reset}");
}

#[tokio::test]
async fn procedure_and_tariff_paths_stay_independent() {
    let service = service();
    let customer = SessionKey::from("conversation-2");

    service
        .resolve(&customer, "25 m3 social")
        .await
        .expect("resolves");

    // A procedure inquiry must not disturb the pending charge.
    let fee = service
        .resolve(&customer, "troca de titularidade")
        .await
        .expect("resolves");
    assert!(fee.contains("Ownership transfer"), "{fee}");

    let water = compute_water(25, ConsumerCategory::Social, 2025).expect("computes");
    let breakdown = compute_total(water, SewagePercent::Eighty);
    let total = service.resolve(&customer, "80").await.expect("resolves");
    assert!(
        total.contains(&format!("Total: R$ {}", breakdown.total)),
        "{total}"
    );
}
