use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use upsell_agent::{PromptBuilder, SalesAgentRuntime};
use upsell_catalog::CatalogStore;
use upsell_core::errors::{ApplicationError, DomainError, InterfaceError};
use upsell_core::offer::OfferRuntime;

use crate::{conversation, health, offer};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub offers: Arc<dyn OfferRuntime>,
    pub agent: Arc<SalesAgentRuntime>,
    pub prompts: Arc<PromptBuilder>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        offers: Arc<dyn OfferRuntime>,
        agent: Arc<SalesAgentRuntime>,
        prompts: Arc<PromptBuilder>,
    ) -> Self {
        Self { catalog, offers, agent, prompts }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/booking/offer", post(offer::create_offer))
        .route("/api/agent/prompt", post(conversation::build_prompt))
        .route("/api/agent/start", post(conversation::start))
        .route("/api/agent/respond", post(conversation::respond))
        .with_state(state)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }

    pub fn internal(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::Internal {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }

    pub fn from_domain(error: DomainError, correlation_id: &str) -> Self {
        Self(ApplicationError::from(error).into_interface(correlation_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.user_message(),
            detail: self.0.message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, response::Response, Router};
    use rust_decimal::Decimal;
    use tower::ServiceExt;
    use upsell_agent::{HeuristicIntentClassifier, PromptBuilder, SalesAgentRuntime};
    use upsell_catalog::{CatalogSnapshot, CatalogStore, SnapshotOrigin};
    use upsell_core::domain::protection::ProtectionPackage;
    use upsell_core::domain::vehicle::{VehicleCategory, VehicleId, VehicleRecord};
    use upsell_core::offer::catalog::Catalog;
    use upsell_core::offer::policy::SelectionPolicy;
    use upsell_core::offer::DeterministicOfferRuntime;

    use super::{router, AppState};

    pub fn catalog() -> Catalog {
        let vehicle = |id: &str, name: &str, category, seats, price, extra| VehicleRecord {
            id: VehicleId(id.to_string()),
            name: name.to_string(),
            category,
            passenger_capacity: seats,
            transmission: "automatic".to_string(),
            total_price: Decimal::new(price, 0),
            extra_cost: Decimal::new(extra, 0),
            is_new: false,
            image_ref: Some(format!("https://img.example/{id}.png")),
        };
        let tier = |name: &str, cost| ProtectionPackage {
            name: name.to_string(),
            summary: format!("{name} cover."),
            cost: Decimal::new(cost, 0),
        };

        Catalog::new(
            vec![
                vehicle("polo", "VW Polo", VehicleCategory::Comparable, 4, 40, 0),
                vehicle("golf", "VW Golf", VehicleCategory::Comparable, 5, 52, 0),
                vehicle("x1", "BMW X1", VehicleCategory::Upsell, 5, 70, 18),
            ],
            vec![tier("Premium", 25), tier("Smart", 12), tier("Basic", 4)],
        )
    }

    pub fn state_with(catalog: Catalog) -> AppState {
        AppState::new(
            Arc::new(CatalogStore::new(CatalogSnapshot::new(catalog, SnapshotOrigin::Cache))),
            Arc::new(DeterministicOfferRuntime::with_policy(SelectionPolicy::default())),
            Arc::new(SalesAgentRuntime::new(Arc::new(HeuristicIntentClassifier))),
            Arc::new(PromptBuilder::new().expect("prompt template")),
        )
    }

    pub fn app() -> Router {
        router(state_with(catalog()))
    }

    pub async fn send(app: Router, request: Request<Body>) -> (Response, serde_json::Value) {
        let response = app.oneshot(request).await.expect("response");
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (Response::from_parts(parts, Body::empty()), json)
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }
}
