pub mod catalog;
pub mod format;
pub mod policy;
pub mod protection;
pub mod selection;

use crate::domain::{preference::PreferenceSet, protection::ProtectionPackage};
use crate::errors::DomainError;

use self::{
    catalog::Catalog,
    format::{format_car_offer, format_protection_offer, OfferResponse},
    policy::SelectionPolicy,
    protection::{ProtectionSelector, ThresholdProtectionSelector},
    selection::{LayeredSelectionEngine, SelectionEngine, VehiclePair},
};

#[derive(Clone, Debug)]
pub struct OfferEvaluationInput<'a> {
    pub preferences: &'a PreferenceSet,
    pub catalog: &'a Catalog,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OfferEvaluation<'a> {
    pub vehicles: VehiclePair<'a>,
    pub protection: &'a ProtectionPackage,
}

impl OfferEvaluation<'_> {
    pub fn to_response(&self) -> OfferResponse {
        OfferResponse {
            upsell_car: format_car_offer(self.vehicles.upsell.vehicle),
            normal_car: format_car_offer(self.vehicles.comparable.vehicle),
            protection: format_protection_offer(self.protection),
        }
    }
}

pub trait OfferRuntime: Send + Sync {
    fn evaluate_offer<'a>(
        &self,
        input: OfferEvaluationInput<'a>,
    ) -> Result<OfferEvaluation<'a>, DomainError>;
}

pub struct DeterministicOfferRuntime<S, P> {
    selection_engine: S,
    protection_selector: P,
}

impl<S, P> DeterministicOfferRuntime<S, P> {
    pub fn new(selection_engine: S, protection_selector: P) -> Self {
        Self { selection_engine, protection_selector }
    }
}

impl DeterministicOfferRuntime<LayeredSelectionEngine, ThresholdProtectionSelector> {
    pub fn with_policy(policy: SelectionPolicy) -> Self {
        Self::new(LayeredSelectionEngine::new(policy), ThresholdProtectionSelector::new(policy))
    }
}

impl Default for DeterministicOfferRuntime<LayeredSelectionEngine, ThresholdProtectionSelector> {
    fn default() -> Self {
        Self::with_policy(SelectionPolicy::default())
    }
}

impl<S, P> OfferRuntime for DeterministicOfferRuntime<S, P>
where
    S: SelectionEngine,
    P: ProtectionSelector,
{
    fn evaluate_offer<'a>(
        &self,
        input: OfferEvaluationInput<'a>,
    ) -> Result<OfferEvaluation<'a>, DomainError> {
        let vehicles = self.selection_engine.select(input.preferences, input.catalog)?;
        let protection = self
            .protection_selector
            .select_protection(input.preferences.budget, input.catalog.protections())?;

        Ok(OfferEvaluation { vehicles, protection })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            preference::PreferenceSet,
            protection::ProtectionPackage,
            vehicle::{VehicleCategory, VehicleId, VehicleRecord},
        },
        errors::DomainError,
        offer::{
            catalog::Catalog,
            policy::SelectionPolicy,
            protection::ProtectionSelector,
            selection::{SelectionStage, StagedVehicle, VehiclePair},
            DeterministicOfferRuntime, OfferEvaluationInput, OfferRuntime,
        },
    };

    #[test]
    fn deterministic_runtime_returns_pair_and_protection() {
        let runtime = DeterministicOfferRuntime::with_policy(SelectionPolicy::default());
        let catalog = catalog_fixture();
        let preferences = PreferenceSet::new(4, Decimal::new(55, 0)).with_transmission("automatic");

        let evaluation = runtime
            .evaluate_offer(OfferEvaluationInput { preferences: &preferences, catalog: &catalog })
            .expect("offer evaluates");

        assert_eq!(evaluation.vehicles.comparable.vehicle.id.0, "golf");
        assert_eq!(evaluation.vehicles.upsell.vehicle.id.0, "x1");
        assert_eq!(evaluation.protection.name, "Smart");

        let response = evaluation.to_response();
        assert_eq!(response.normal_car.price_delta, "Same Price");
        assert_eq!(response.upsell_car.price_delta, "+$18/day");
        assert_eq!(response.protection.price, "$12/day");
    }

    #[test]
    fn runtime_supports_explicit_engine_interfaces() {
        struct FirstOfEach;

        impl crate::offer::selection::SelectionEngine for FirstOfEach {
            fn select<'a>(
                &self,
                _preferences: &PreferenceSet,
                catalog: &'a Catalog,
            ) -> Result<VehiclePair<'a>, DomainError> {
                let first = |category| {
                    catalog
                        .pool(category)
                        .next()
                        .map(|vehicle| StagedVehicle { vehicle, stage: SelectionStage::Fallback })
                        .ok_or(DomainError::EmptyCatalog { category })
                };
                Ok(VehiclePair {
                    comparable: first(VehicleCategory::Comparable)?,
                    upsell: first(VehicleCategory::Upsell)?,
                })
            }
        }

        struct AlwaysFirstTier;

        impl ProtectionSelector for AlwaysFirstTier {
            fn select_protection<'a>(
                &self,
                _budget: Decimal,
                tiers: &'a [ProtectionPackage],
            ) -> Result<&'a ProtectionPackage, DomainError> {
                tiers.first().ok_or_else(|| DomainError::InvalidCatalog("no tiers".to_string()))
            }
        }

        let runtime = DeterministicOfferRuntime::new(FirstOfEach, AlwaysFirstTier);
        let catalog = catalog_fixture();
        let preferences = PreferenceSet::new(2, Decimal::new(100, 0));

        let evaluation = runtime
            .evaluate_offer(OfferEvaluationInput { preferences: &preferences, catalog: &catalog })
            .expect("offer evaluates");

        assert_eq!(evaluation.vehicles.comparable.vehicle.id.0, "polo");
        assert_eq!(evaluation.protection.name, "Premium");
    }

    #[test]
    fn protection_errors_surface_after_successful_selection() {
        let runtime = DeterministicOfferRuntime::with_policy(SelectionPolicy::default());
        let catalog = Catalog::new(catalog_fixture().vehicles().to_vec(), Vec::new());
        let preferences = PreferenceSet::new(2, Decimal::new(50, 0));

        let error = runtime
            .evaluate_offer(OfferEvaluationInput { preferences: &preferences, catalog: &catalog })
            .expect_err("no protection tiers");

        assert!(matches!(error, DomainError::InvalidCatalog(_)));
    }

    fn catalog_fixture() -> Catalog {
        let vehicle = |id: &str, name: &str, category, seats, price, extra| VehicleRecord {
            id: VehicleId(id.to_string()),
            name: name.to_string(),
            category,
            passenger_capacity: seats,
            transmission: "automatic".to_string(),
            total_price: Decimal::new(price, 0),
            extra_cost: Decimal::new(extra, 0),
            is_new: false,
            image_ref: None,
        };
        let tier = |name: &str, cost| ProtectionPackage {
            name: name.to_string(),
            summary: format!("{name} protection"),
            cost: Decimal::new(cost, 0),
        };

        Catalog::new(
            vec![
                vehicle("polo", "VW Polo", VehicleCategory::Comparable, 4, 40, 0),
                vehicle("golf", "VW Golf", VehicleCategory::Comparable, 5, 52, 0),
                vehicle("x1", "BMW X1", VehicleCategory::Upsell, 5, 70, 18),
                vehicle("a6", "Audi A6", VehicleCategory::Upsell, 5, 95, 43),
            ],
            vec![tier("Premium", 25), tier("Smart", 12), tier("Basic", 4)],
        )
    }
}
