use thiserror::Error;

use crate::flows::states::{
    ConversationState, CustomerIntent, FlowAction, FlowEvent, TransitionOutcome,
};

pub trait FlowDefinition {
    fn initial_state(&self) -> ConversationState;
    fn transition(
        &self,
        current: ConversationState,
        event: FlowEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// Upsell first, comparable car as the backup, protection last.
#[derive(Clone, Debug, Default)]
pub struct UpsellFlow;

impl FlowDefinition for UpsellFlow {
    fn initial_state(&self) -> ConversationState {
        ConversationState::Connecting
    }

    fn transition(
        &self,
        current: ConversationState,
        event: FlowEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_upsell(current, event)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_state(&self) -> ConversationState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: ConversationState,
        event: FlowEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event)
    }
}

impl Default for FlowEngine<UpsellFlow> {
    fn default() -> Self {
        Self::new(UpsellFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("conversation already ended in {state:?}")]
    Terminal { state: ConversationState },
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: ConversationState, event: FlowEvent },
}

fn transition_upsell(
    current: ConversationState,
    event: FlowEvent,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use ConversationState::{
        Completed, Connecting, Escalated, NormalOffer, ProtectionOffer, UpsellOffer,
    };
    use CustomerIntent::{Escalate, Negative, Positive, Unclear};
    use FlowAction::{
        AcceptComparable, AcceptUpsell, AddProtection, ConfirmBooking, HandOffToHuman,
        PitchComparable, PitchProtection, PitchUpsell, RepeatOffer,
    };
    use FlowEvent::{Connected, Intent};

    let (to, actions) = match (current, event) {
        (Completed | Escalated, _) => return Err(FlowTransitionError::Terminal { state: current }),
        (Connecting, Connected) => (UpsellOffer, vec![PitchUpsell]),
        (Connecting, Intent(_)) | (_, Connected) => {
            return Err(FlowTransitionError::InvalidTransition { state: current, event });
        }
        (_, Intent(Escalate)) => (Escalated, vec![HandOffToHuman]),
        (_, Intent(Unclear)) => (current, vec![RepeatOffer]),
        (UpsellOffer, Intent(Positive)) => (ProtectionOffer, vec![AcceptUpsell, PitchProtection]),
        (UpsellOffer, Intent(Negative)) => (NormalOffer, vec![PitchComparable]),
        (NormalOffer, Intent(Positive)) => {
            (ProtectionOffer, vec![AcceptComparable, PitchProtection])
        }
        // No further backup after the comparable car is declined.
        (NormalOffer, Intent(Negative)) => (Escalated, vec![HandOffToHuman]),
        (ProtectionOffer, Intent(Positive)) => (Completed, vec![AddProtection, ConfirmBooking]),
        (ProtectionOffer, Intent(Negative)) => (Completed, vec![ConfirmBooking]),
    };

    Ok(TransitionOutcome { from: current, to, event, actions })
}
