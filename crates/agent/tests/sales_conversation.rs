use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use upsell_agent::{HeuristicIntentClassifier, IntentClassifier, SalesAgentRuntime};
use upsell_core::errors::DomainError;
use upsell_core::flows::{ConversationState, CustomerIntent, FlowTransitionError};
use upsell_core::offer::format::{CarOffer, OfferResponse, ProtectionOffer};

fn offer() -> OfferResponse {
    let car = |id: &str, name: &str, delta: &str| CarOffer {
        id: id.to_string(),
        name: name.to_string(),
        image: None,
        price_delta: delta.to_string(),
        description: String::new(),
    };
    OfferResponse {
        upsell_car: car("x1", "BMW X1", "+$18/day"),
        normal_car: car("golf", "VW Golf", "Same Price"),
        protection: ProtectionOffer {
            name: "Premium Protection".to_string(),
            price: "$25/day".to_string(),
            description: "Zero excess.".to_string(),
        },
    }
}

struct Unreachable;

#[async_trait]
impl IntentClassifier for Unreachable {
    async fn classify(&self, _state: ConversationState, _user_text: &str) -> Result<CustomerIntent> {
        bail!("connection refused")
    }
}

#[tokio::test]
async fn customer_accepts_upsell_then_declines_protection() {
    let runtime = SalesAgentRuntime::new(Arc::new(HeuristicIntentClassifier));
    let offer = offer();

    let opening = runtime.start(&offer, Some("Alex")).expect("start");
    assert_eq!(opening.next_state, ConversationState::UpsellOffer);
    assert!(opening.agent_script.starts_with("Hi Alex."));

    let turn = runtime
        .respond(opening.next_state, "Yes please, let's upgrade", &offer)
        .await
        .expect("respond");
    assert_eq!(turn.next_state, ConversationState::ProtectionOffer);
    assert_eq!(turn.intent, Some(CustomerIntent::Positive));
    assert!(turn.agent_script.contains("Premium Protection"));

    let turn = runtime.respond(turn.next_state, "No, thanks", &offer).await.expect("respond");
    assert_eq!(turn.next_state, ConversationState::Completed);
    assert!(turn.agent_script.contains("standard coverage only"));
}

#[tokio::test]
async fn unclear_reply_stays_on_the_same_offer() {
    let runtime = SalesAgentRuntime::new(Arc::new(HeuristicIntentClassifier));

    let turn = runtime
        .respond(ConversationState::UpsellOffer, "What colour is it?", &offer())
        .await
        .expect("respond");

    assert_eq!(turn.next_state, ConversationState::UpsellOffer);
    assert_eq!(turn.intent, Some(CustomerIntent::Unclear));
    assert!(turn.agent_script.contains("I didn't understand"));
}

#[tokio::test]
async fn classifier_failure_escalates_with_connection_script() {
    let runtime = SalesAgentRuntime::new(Arc::new(Unreachable));

    let turn = runtime
        .respond(ConversationState::NormalOffer, "sure", &offer())
        .await
        .expect("respond");

    assert_eq!(turn.next_state, ConversationState::Escalated);
    assert_eq!(turn.intent, None);
    assert!(turn.agent_script.contains("trouble connecting"));
}

#[tokio::test]
async fn finished_conversations_reject_further_replies() {
    let runtime = SalesAgentRuntime::new(Arc::new(HeuristicIntentClassifier));

    let error = runtime
        .respond(ConversationState::Completed, "hello?", &offer())
        .await
        .expect_err("terminal");

    assert!(matches!(
        error,
        DomainError::FlowTransition(FlowTransitionError::Terminal {
            state: ConversationState::Completed
        })
    ));
}
