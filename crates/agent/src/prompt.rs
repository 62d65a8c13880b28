use anyhow::{Context as _, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tera::{Context, Tera};

use crate::llm::ChatMessage;

const SYSTEM_PROMPT_TEMPLATE: &str = "system_prompt.txt";

/// What the avatar knows about the customer's booking. Fields arrive from
/// the front end as strings or numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub car: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub budget: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub passengers: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub luggage: Option<String>,
}

pub struct PromptBuilder {
    templates: Tera,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut templates = Tera::default();
        templates
            .add_raw_template(
                SYSTEM_PROMPT_TEMPLATE,
                include_str!("../templates/system_prompt.txt"),
            )
            .context("system prompt template is invalid")?;
        Ok(Self { templates })
    }

    /// Persona prompt followed by the conversation so far.
    pub fn build(
        &self,
        booking: &BookingSummary,
        conversation: &[ChatMessage],
    ) -> Result<Vec<ChatMessage>> {
        let mut context = Context::new();
        context.insert("name", booking.name.as_deref().unwrap_or("customer"));
        context.insert("car", booking.car.as_deref().unwrap_or("the booked car"));
        context.insert("budget", booking.budget.as_deref().unwrap_or_default());
        context.insert("passengers", booking.passengers.as_deref().unwrap_or_default());
        context.insert("luggage", booking.luggage.as_deref().unwrap_or_default());
        context.insert("conversation", conversation);

        let system = self
            .templates
            .render(SYSTEM_PROMPT_TEMPLATE, &context)
            .context("failed to render system prompt")?;

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(conversation);
        Ok(messages)
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}
