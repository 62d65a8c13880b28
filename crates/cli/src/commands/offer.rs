use std::fs;
use std::path::Path;

use upsell_catalog::CatalogCache;
use upsell_core::config::{AppConfig, LoadOptions};
use upsell_core::domain::booking::BookingRequest;
use upsell_core::errors::DomainError;
use upsell_core::offer::{DeterministicOfferRuntime, OfferEvaluationInput, OfferRuntime};

use crate::commands::{CommandResult, EXIT_CATALOG, EXIT_CONFIG, EXIT_REQUEST};

pub fn run(request_path: &Path) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "offer",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let request = match read_request(request_path) {
        Ok(request) => request,
        Err(message) => return CommandResult::failure("offer", "request", message, EXIT_REQUEST),
    };

    let catalog = match CatalogCache::new(config.catalog.cache_dir.clone()).load() {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("offer", "catalog_cache", error.to_string(), EXIT_CATALOG)
        }
    };

    let runtime = DeterministicOfferRuntime::with_policy(config.selection);
    let preferences = request.preference_set();
    let evaluation = match runtime
        .evaluate_offer(OfferEvaluationInput { preferences: &preferences, catalog: &catalog })
    {
        Ok(evaluation) => evaluation,
        Err(error @ (DomainError::EmptyCatalog { .. } | DomainError::InvalidCatalog(_))) => {
            return CommandResult::failure("offer", "catalog", error.to_string(), EXIT_CATALOG);
        }
        Err(error) => {
            return CommandResult::failure("offer", "domain", error.to_string(), EXIT_REQUEST);
        }
    };

    let message = format!(
        "comparable `{}` ({}), upsell `{}` ({}), protection `{}`",
        evaluation.vehicles.comparable.vehicle.id.0,
        evaluation.vehicles.comparable.stage.as_str(),
        evaluation.vehicles.upsell.vehicle.id.0,
        evaluation.vehicles.upsell.stage.as_str(),
        evaluation.protection.name,
    );

    match serde_json::to_value(evaluation.to_response()) {
        Ok(data) => CommandResult::success_with_data("offer", message, Some(data)),
        Err(error) => CommandResult::failure("offer", "serialization", error.to_string(), 1),
    }
}

fn read_request(path: &Path) -> Result<BookingRequest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|error| format!("could not parse `{}`: {error}", path.display()))
}
