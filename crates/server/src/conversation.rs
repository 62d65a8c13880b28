use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use upsell_agent::{AgentTurn, BookingSummary, ChatMessage};
use upsell_core::flows::ConversationState;
use upsell_core::offer::format::OfferResponse;
use uuid::Uuid;

use crate::routes::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub booking: BookingSummary,
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(flatten)]
    pub offer: OfferResponse,
    #[serde(default)]
    pub customer_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub state: ConversationState,
    pub user_text: String,
    pub offer: OfferResponse,
}

pub async fn build_prompt(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<PromptResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let messages = state
        .prompts
        .build(&request.booking, &request.conversation)
        .map_err(|error| ApiError::internal(error.to_string(), &correlation_id))?;

    Ok(Json(PromptResponse { messages }))
}

pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<AgentTurn>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let turn = state
        .agent
        .start(&request.offer, request.customer_name.as_deref())
        .map_err(|error| ApiError::from_domain(error, &correlation_id))?;

    info!(
        event_name = "agent.started",
        correlation_id = %correlation_id,
        upsell_car = %request.offer.upsell_car.id,
        "sales conversation started"
    );
    Ok(Json(turn))
}

pub async fn respond(
    State(state): State<AppState>,
    payload: Result<Json<RespondRequest>, JsonRejection>,
) -> Result<Json<AgentTurn>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let turn = state
        .agent
        .respond(request.state, &request.user_text, &request.offer)
        .await
        .map_err(|error| {
            warn!(
                event_name = "agent.transition_rejected",
                correlation_id = %correlation_id,
                state = ?request.state,
                error = %error,
                "conversation step rejected"
            );
            ApiError::from_domain(error, &correlation_id)
        })?;

    info!(
        event_name = "agent.responded",
        correlation_id = %correlation_id,
        from = ?request.state,
        to = ?turn.next_state,
        intent = ?turn.intent,
        "sales conversation advanced"
    );
    Ok(Json(turn))
}
