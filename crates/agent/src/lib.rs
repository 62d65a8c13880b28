//! Sales agent runtime - conversational upsell on top of a computed offer
//!
//! The agent walks a customer through the offer produced by the core:
//! the upsell car first, the comparable car as the backup, protection last.
//!
//! # Architecture
//!
//! 1. **Intent Classification** (`intent`) - customer reply → `CustomerIntent`
//! 2. **Flow Transition** (core `flows`) - deterministic state machine step
//! 3. **Script Rendering** (`script`) - the agent's next line for that step
//!
//! # Key Types
//!
//! - `SalesAgentRuntime` - orchestrator (see `runtime` module)
//! - `LlmClient` - pluggable chat-completions backend (OpenAI / Ollama)
//! - `IntentClassifier` - LLM-backed or keyword heuristic
//! - `PromptBuilder` - persona prompt for free-form avatar conversations
//!
//! # Safety Principle
//!
//! The LLM only labels what the customer said. It never picks cars,
//! prices or protection tiers; those come from the offer engine.

pub mod intent;
pub mod llm;
pub mod prompt;
pub mod runtime;
pub mod script;

pub use intent::{HeuristicIntentClassifier, IntentClassifier, LlmIntentClassifier};
pub use llm::{ChatMessage, ChatRole, LlmClient, OpenAiCompatibleClient};
pub use prompt::{BookingSummary, PromptBuilder};
pub use runtime::{AgentTurn, SalesAgentRuntime};
