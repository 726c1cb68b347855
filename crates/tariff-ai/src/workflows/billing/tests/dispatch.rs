use super::common::{relaxed_policy, router, session, strict_policy, ScriptedAssistant};

#[tokio::test]
async fn procedure_inquiry_replies_with_the_fee() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant.clone(), relaxed_policy());

    let reply = service
        .resolve(&session(), "how much is a reconnection?")
        .await
        .expect("resolves");

    assert!(reply.contains("Reconnection"), "{reply}");
    assert!(reply.contains("R$ 36.94"), "{reply}");
    assert!(assistant.calls().is_empty(), "no assistant involvement");
}

#[tokio::test]
async fn displacement_without_ground_lists_every_variant() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant, relaxed_policy());

    let reply = service
        .resolve(&session(), "what does a displacement cost")
        .await
        .expect("resolves");

    assert!(reply.contains("unpaved ground R$ 89.43"), "{reply}");
    assert!(reply.contains("paved ground R$ 134.12"), "{reply}");
}

#[tokio::test]
async fn minimum_charge_question_is_answered_locally() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant.clone(), relaxed_policy());

    let reply = service
        .resolve(&session(), "qual é a taxa mínima de água?")
        .await
        .expect("resolves");

    // 2025 residential band 1 billed in full: 10 × 4.859.
    assert!(reply.contains("R$ 48.59"), "{reply}");
    assert!(reply.contains("10 m³"), "{reply}");
    assert!(assistant.calls().is_empty(), "no assistant involvement");
}

#[tokio::test]
async fn installment_question_is_answered_locally() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant.clone(), relaxed_policy());

    let reply = service
        .resolve(&session(), "posso fazer parcelamento?")
        .await
        .expect("resolves");

    assert!(reply.contains("5 installments"), "{reply}");
    assert!(reply.contains("48 installments"), "{reply}");
    assert!(assistant.calls().is_empty(), "no assistant involvement");
}

#[tokio::test]
async fn volume_without_category_asks_for_one() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant, relaxed_policy());

    let reply = service
        .resolve(&session(), "15 m3")
        .await
        .expect("resolves");

    assert!(reply.contains("consumer category"), "{reply}");
    assert!(reply.contains("residential"), "{reply}");
}

#[tokio::test]
async fn missing_year_is_prompted_under_the_strict_policy() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant, strict_policy());

    let reply = service
        .resolve(&session(), "15 m3 residential")
        .await
        .expect("resolves");

    assert!(reply.contains("tariff year"), "{reply}");
    assert!(reply.contains("2024, 2025"), "{reply}");
}

#[tokio::test]
async fn inline_percentage_completes_in_one_turn() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant, relaxed_policy());

    let reply = service
        .resolve(&session(), "12 m3 comercial 80")
        .await
        .expect("resolves");

    // water 146.83, sewage 117.46, total 264.29
    assert!(reply.contains("R$ 146.83"), "{reply}");
    assert!(reply.contains("R$ 117.46"), "{reply}");
    assert!(reply.contains("Total: R$ 264.29"), "{reply}");

    // Nothing pending: a follow-up percentage asks to start over.
    let follow_up = service.resolve(&session(), "90").await.expect("resolves");
    assert!(follow_up.contains("pending"), "{follow_up}");
}

#[tokio::test]
async fn complete_queries_are_idempotent() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant, relaxed_policy());

    let first = service
        .resolve(&session(), "20 m3 commercial 80")
        .await
        .expect("resolves");
    let second = service
        .resolve(&session(), "20 m3 commercial 80")
        .await
        .expect("resolves");

    assert_eq!(first, second);
}

#[tokio::test]
async fn unmatched_text_is_forwarded_verbatim() {
    let assistant = ScriptedAssistant::replying("We open at 8am.");
    let service = router(assistant.clone(), relaxed_policy());

    let reply = service
        .resolve(&session(), "what are your business hours")
        .await
        .expect("resolves");

    assert_eq!(reply, "We open at 8am.");
    assert_eq!(assistant.calls(), vec!["what are your business hours"]);
}

#[tokio::test]
async fn empty_input_is_the_only_transport_error() {
    let assistant = ScriptedAssistant::replying("unused");
    let service = router(assistant, relaxed_policy());

    let err = service
        .resolve(&session(), "   ")
        .await
        .expect_err("empty input rejected");
    assert_eq!(
        err,
        crate::workflows::billing::dialog::DialogError::EmptyInput
    );
}
