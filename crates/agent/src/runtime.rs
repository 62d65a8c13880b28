use std::sync::Arc;

use serde::{Deserialize, Serialize};
use upsell_core::errors::DomainError;
use upsell_core::flows::{
    ConversationState, CustomerIntent, FlowEngine, FlowEvent, FlowTransitionError, UpsellFlow,
};
use upsell_core::offer::format::OfferResponse;

use crate::intent::IntentClassifier;
use crate::script;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTurn {
    pub next_state: ConversationState,
    pub intent: Option<CustomerIntent>,
    pub agent_script: String,
}

pub struct SalesAgentRuntime {
    classifier: Arc<dyn IntentClassifier>,
    flow: FlowEngine<UpsellFlow>,
}

impl SalesAgentRuntime {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier, flow: FlowEngine::new(UpsellFlow) }
    }

    pub fn start(
        &self,
        offer: &OfferResponse,
        customer_name: Option<&str>,
    ) -> Result<AgentTurn, DomainError> {
        let outcome = self.flow.apply(self.flow.initial_state(), FlowEvent::Connected)?;

        Ok(AgentTurn {
            next_state: outcome.to,
            intent: None,
            agent_script: script::opening(offer, customer_name),
        })
    }

    /// One customer reply. A classifier failure hands the customer to a
    /// human instead of guessing.
    pub async fn respond(
        &self,
        state: ConversationState,
        user_text: &str,
        offer: &OfferResponse,
    ) -> Result<AgentTurn, DomainError> {
        if state.is_terminal() {
            return Err(FlowTransitionError::Terminal { state }.into());
        }

        let intent = match self.classifier.classify(state, user_text).await {
            Ok(intent) => intent,
            Err(_) => {
                let outcome =
                    self.flow.apply(state, FlowEvent::Intent(CustomerIntent::Escalate))?;
                return Ok(AgentTurn {
                    next_state: outcome.to,
                    intent: None,
                    agent_script: script::CONNECTION_TROUBLE.to_string(),
                });
            }
        };

        let outcome = self.flow.apply(state, FlowEvent::Intent(intent))?;
        Ok(AgentTurn {
            next_state: outcome.to,
            intent: Some(intent),
            agent_script: script::for_outcome(&outcome, offer),
        })
    }
}
