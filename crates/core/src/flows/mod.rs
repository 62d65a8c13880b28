pub mod engine;
pub mod states;

pub use engine::{FlowDefinition, FlowEngine, FlowTransitionError, UpsellFlow};
pub use states::{ConversationState, CustomerIntent, FlowAction, FlowEvent, TransitionOutcome};
