use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};
use upsell_core::domain::booking::BookingRequest;
use upsell_core::offer::format::OfferResponse;
use upsell_core::offer::OfferEvaluationInput;
use uuid::Uuid;

use crate::routes::{ApiError, AppState};

pub async fn create_offer(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<OfferResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    info!(
        event_name = "offer.requested",
        correlation_id = %correlation_id,
        preferred_car = %request.reservation.preferred_car,
        passengers = request.preferences.passengers,
        budget = %request.preferences.budget,
        "booking offer requested"
    );

    let snapshot = state.catalog.current().await;
    let preferences = request.preference_set();
    let evaluation = state
        .offers
        .evaluate_offer(OfferEvaluationInput { preferences: &preferences, catalog: &snapshot.catalog })
        .map_err(|error| {
            warn!(
                event_name = "offer.rejected",
                correlation_id = %correlation_id,
                error = %error,
                "no offer produced"
            );
            ApiError::from_domain(error, &correlation_id)
        })?;

    info!(
        event_name = "offer.selected",
        correlation_id = %correlation_id,
        comparable_id = %evaluation.vehicles.comparable.vehicle.id.0,
        comparable_stage = evaluation.vehicles.comparable.stage.as_str(),
        upsell_id = %evaluation.vehicles.upsell.vehicle.id.0,
        upsell_stage = evaluation.vehicles.upsell.stage.as_str(),
        protection = %evaluation.protection.name,
        "booking offer selected"
    );

    Ok(Json(evaluation.to_response()))
}
