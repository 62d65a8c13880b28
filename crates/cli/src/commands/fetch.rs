use upsell_catalog::{CatalogCache, CatalogSource, RentalApiClient};
use upsell_core::config::{AppConfig, LoadOptions};

use crate::commands::{CommandResult, EXIT_CATALOG, EXIT_CONFIG};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "fetch",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "fetch",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_CATALOG,
            );
        }
    };

    let cache = CatalogCache::new(config.catalog.cache_dir.clone());
    let result = runtime.block_on(async {
        let client = RentalApiClient::new(&config.rental_api)
            .map_err(|error| ("rental_api", error.to_string()))?;
        let catalog =
            client.fetch_catalog().await.map_err(|error| ("rental_api", error.to_string()))?;
        cache.store(&catalog).map_err(|error| ("catalog_cache", error.to_string()))?;
        Ok::<_, (&'static str, String)>(catalog)
    });

    match result {
        Ok(catalog) => CommandResult::success(
            "fetch",
            format!(
                "cached {} vehicles and {} protection tiers in `{}`",
                catalog.vehicles().len(),
                catalog.protections().len(),
                cache.dir().display()
            ),
        ),
        Err((error_class, message)) => {
            CommandResult::failure("fetch", error_class, message, EXIT_CATALOG)
        }
    }
}
