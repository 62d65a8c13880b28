use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Connecting,
    UpsellOffer,
    NormalOffer,
    ProtectionOffer,
    Completed,
    Escalated,
}

impl ConversationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Escalated)
    }
}

/// How the customer responded to the agent's last line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerIntent {
    Positive,
    Negative,
    Escalate,
    Unclear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
    Connected,
    Intent(CustomerIntent),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    PitchUpsell,
    PitchComparable,
    PitchProtection,
    AcceptUpsell,
    AcceptComparable,
    AddProtection,
    ConfirmBooking,
    RepeatOffer,
    HandOffToHuman,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: ConversationState,
    pub to: ConversationState,
    pub event: FlowEvent,
    pub actions: Vec<FlowAction>,
}
