use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use upsell_catalog::{CatalogSnapshot, SnapshotOrigin};
use upsell_core::domain::vehicle::VehicleCategory;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogHealth {
    pub status: &'static str,
    pub detail: String,
    pub origin: SnapshotOrigin,
    pub age_secs: i64,
    pub comparable_vehicles: usize,
    pub upsell_vehicles: usize,
    pub protection_tiers: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: CatalogHealth,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let snapshot = state.catalog.current().await;
    let catalog = catalog_check(&snapshot);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "upsell-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(snapshot: &CatalogSnapshot) -> CatalogHealth {
    let comparable_vehicles = snapshot.catalog.pool_len(VehicleCategory::Comparable);
    let upsell_vehicles = snapshot.catalog.pool_len(VehicleCategory::Upsell);
    let protection_tiers = snapshot.catalog.protections().len();

    let (status, detail) = if snapshot.is_ready() {
        ("ready", "catalog can serve offers".to_string())
    } else {
        (
            "degraded",
            format!(
                "catalog cannot serve offers: {comparable_vehicles} comparable, \
{upsell_vehicles} upsell, {protection_tiers} protection tiers"
            ),
        )
    };

    CatalogHealth {
        status,
        detail,
        origin: snapshot.origin,
        age_secs: snapshot.age_secs(Utc::now()),
        comparable_vehicles,
        upsell_vehicles,
        protection_tiers,
    }
}
