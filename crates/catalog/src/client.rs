use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use upsell_core::config::RentalApiConfig;
use upsell_core::offer::catalog::Catalog;

use crate::error::CatalogError;
use crate::raw::{BookingCreated, ProtectionsPayload, VehiclesPayload};
use crate::simplify::{simplify_protections, simplify_vehicles};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError>;
}

/// Reads the live catalog by opening a throwaway booking and listing what
/// the provider offers for it.
#[derive(Clone, Debug)]
pub struct RentalApiClient {
    base_url: String,
    http: Client,
}

impl RentalApiClient {
    pub fn new(config: &RentalApiConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CatalogError::Client)?;

        Ok(Self { base_url: config.base_url.trim_end_matches('/').to_string(), http })
    }

    pub async fn create_booking(&self) -> Result<String, CatalogError> {
        let url = format!("{}/api/booking", self.base_url);
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|source| CatalogError::Http { url: url.clone(), source })?;

        let created: BookingCreated = decode(&url, response).await?;
        debug!(event_name = "catalog.booking_created", booking_id = %created.id, "booking created");
        Ok(created.id)
    }

    pub async fn vehicles(&self, booking_id: &str) -> Result<VehiclesPayload, CatalogError> {
        self.get(&format!("{}/api/booking/{booking_id}/vehicles", self.base_url)).await
    }

    pub async fn protections(&self, booking_id: &str) -> Result<ProtectionsPayload, CatalogError> {
        self.get(&format!("{}/api/booking/{booking_id}/protections", self.base_url)).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Http { url: url.to_string(), source })?;

        decode(url, response).await
    }
}

#[async_trait]
impl CatalogSource for RentalApiClient {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let booking_id = self.create_booking().await?;
        let vehicles = simplify_vehicles(self.vehicles(&booking_id).await?);
        let protections = simplify_protections(self.protections(&booking_id).await?);

        info!(
            event_name = "catalog.fetched",
            booking_id = %booking_id,
            vehicle_count = vehicles.len(),
            protection_count = protections.len(),
            "rental catalog fetched"
        );

        Ok(Catalog::new(vehicles, protections))
    }
}

async fn decode<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status { url: url.to_string(), status: status.as_u16() });
    }

    response.json::<T>().await.map_err(|source| CatalogError::Http { url: url.to_string(), source })
}
