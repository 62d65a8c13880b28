use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use upsell_core::flows::{ConversationState, CustomerIntent};

use crate::llm::{ChatMessage, LlmClient};

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, state: ConversationState, user_text: &str) -> Result<CustomerIntent>;
}

pub fn classification_prompt(state: ConversationState) -> String {
    let state = serde_json::to_value(state)
        .ok()
        .and_then(|value| value.as_str().map(str::to_uppercase))
        .unwrap_or_default();

    format!(
        "You are a car rental booking assistant.
Current State: {state}

Your Goal: Classify the user's intent based on their response.

Return a JSON object with:
- \"intent\": \"POSITIVE\" | \"NEGATIVE\" | \"ESCALATE\" | \"UNCLEAR\"

Rules for Classification:
1. POSITIVE: User agrees, says yes, or accepts the offer.
2. NEGATIVE: User declines, says no, or prefers the previous option.
3. ESCALATE: User explicitly asks for a \"human\", \"agent\", \"representative\", \"manager\", or says \"talk to someone else\".
4. UNCLEAR: User asks a question, gives an ambiguous answer, or says something unrelated. Do not escalate for this, the question will be asked again.
"
    )
}

#[derive(Deserialize)]
struct IntentReply {
    intent: String,
}

/// Reads `{"intent": "..."}`; the label is matched ignoring case and
/// surrounding whitespace.
pub fn parse_intent(raw: &str) -> Result<CustomerIntent> {
    let reply: IntentReply =
        serde_json::from_str(raw.trim()).context("intent reply is not a json object")?;

    match reply.intent.trim().to_ascii_uppercase().as_str() {
        "POSITIVE" => Ok(CustomerIntent::Positive),
        "NEGATIVE" => Ok(CustomerIntent::Negative),
        "ESCALATE" => Ok(CustomerIntent::Escalate),
        "UNCLEAR" => Ok(CustomerIntent::Unclear),
        other => Err(anyhow!("unknown intent label `{other}`")),
    }
}

pub struct LlmIntentClassifier {
    client: Arc<dyn LlmClient>,
}

impl LlmIntentClassifier {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(&self, state: ConversationState, user_text: &str) -> Result<CustomerIntent> {
        let messages =
            [ChatMessage::system(classification_prompt(state)), ChatMessage::user(user_text)];
        let reply = self.client.complete(&messages).await?;
        parse_intent(&reply)
    }
}

const ESCALATION_PHRASES: &[&str] = &[
    "talk to a human",
    "speak to a human",
    "talk to an agent",
    "speak to an agent",
    "speak with an agent",
    "talk to someone",
    "speak to someone",
    "real person",
    "someone else",
    "manager",
    "representative",
];

const HEDGE_PHRASES: &[&str] =
    &["not sure", "unsure", "don't know", "dont know", "maybe", "perhaps", "let me think"];

const AFFIRMATIVE_PHRASES: &[&str] =
    &["why not", "no problem", "sounds good", "go ahead", "of course", "let's do it"];

const NEGATIVE_WORDS: &[&str] =
    &["no", "nope", "nah", "not", "don't", "dont", "decline", "pass", "skip", "never"];

const POSITIVE_WORDS: &[&str] = &[
    "yes", "yeah", "yep", "sure", "ok", "okay", "great", "perfect", "deal", "fine", "absolutely",
    "definitely", "please", "accept",
];

/// Keyword classifier used when no language model is configured.
///
/// An explicit request for a person wins, then hedges and questions, then
/// fixed affirmative phrases. Otherwise the first yes/no word decides.
#[derive(Clone, Debug, Default)]
pub struct HeuristicIntentClassifier;

impl HeuristicIntentClassifier {
    pub fn classify_text(&self, user_text: &str) -> CustomerIntent {
        let normalized = user_text.to_lowercase().replace('\u{2019}', "'");
        let words = normalized
            .split(|ch: char| !(ch.is_alphanumeric() || ch == '\''))
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>();
        // Padded so phrases only match on word boundaries.
        let padded = format!(" {} ", words.join(" "));
        let has_phrase =
            |phrases: &[&str]| phrases.iter().any(|phrase| padded.contains(&format!(" {phrase} ")));

        if has_phrase(ESCALATION_PHRASES) {
            return CustomerIntent::Escalate;
        }
        if has_phrase(HEDGE_PHRASES) || normalized.trim_end().ends_with('?') {
            return CustomerIntent::Unclear;
        }
        if has_phrase(AFFIRMATIVE_PHRASES) {
            return CustomerIntent::Positive;
        }

        words
            .iter()
            .find_map(|word| {
                if NEGATIVE_WORDS.contains(word) {
                    Some(CustomerIntent::Negative)
                } else if POSITIVE_WORDS.contains(word) {
                    Some(CustomerIntent::Positive)
                } else {
                    None
                }
            })
            .unwrap_or(CustomerIntent::Unclear)
    }
}

#[async_trait]
impl IntentClassifier for HeuristicIntentClassifier {
    async fn classify(&self, _state: ConversationState, user_text: &str) -> Result<CustomerIntent> {
        Ok(self.classify_text(user_text))
    }
}
