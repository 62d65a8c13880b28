//! Layered constraint relaxation over the comparable and upsell pools.
//!
//! Each pool is run through four stages in strict order and the first stage
//! with survivors decides:
//!
//! 1. `Strict`: seats, transmission and `total_price <= budget * slack`; priciest wins.
//! 2. `RelaxedBudget`: seats and transmission; cheapest wins.
//! 3. `RelaxedTransmission`: seats only; priciest wins.
//! 4. `Fallback`: the whole working set; priciest wins.
//!
//! Ties on price resolve to the first record in catalog order, for both the
//! maximum and the minimum.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::preference::PreferenceSet;
use crate::domain::vehicle::{VehicleCategory, VehicleRecord};
use crate::errors::DomainError;
use crate::offer::{catalog::Catalog, policy::SelectionPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    Strict,
    RelaxedBudget,
    RelaxedTransmission,
    Fallback,
}

impl SelectionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::RelaxedBudget => "relaxed_budget",
            Self::RelaxedTransmission => "relaxed_transmission",
            Self::Fallback => "fallback",
        }
    }
}

/// A vehicle borrowed from the catalog together with the stage that chose it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedVehicle<'a> {
    pub vehicle: &'a VehicleRecord,
    pub stage: SelectionStage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VehiclePair<'a> {
    pub comparable: StagedVehicle<'a>,
    pub upsell: StagedVehicle<'a>,
}

pub trait SelectionEngine: Send + Sync {
    fn select<'a>(
        &self,
        preferences: &PreferenceSet,
        catalog: &'a Catalog,
    ) -> Result<VehiclePair<'a>, DomainError>;
}

#[derive(Clone, Debug, Default)]
pub struct LayeredSelectionEngine {
    policy: SelectionPolicy,
}

impl LayeredSelectionEngine {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }
}

impl SelectionEngine for LayeredSelectionEngine {
    fn select<'a>(
        &self,
        preferences: &PreferenceSet,
        catalog: &'a Catalog,
    ) -> Result<VehiclePair<'a>, DomainError> {
        let criteria = Criteria::from_preferences(preferences, &self.policy)?;

        let comparable_pool = non_empty_pool(catalog, VehicleCategory::Comparable)?;
        let upsell_pool = non_empty_pool(catalog, VehicleCategory::Upsell)?;

        let working_set =
            narrow_to_preferred(&comparable_pool, preferences.preferred_vehicle_name.as_deref());

        let comparable = apply_stages(&working_set, &criteria)
            .ok_or(DomainError::EmptyCatalog { category: VehicleCategory::Comparable })?;
        let upsell = apply_stages(&upsell_pool, &criteria)
            .ok_or(DomainError::EmptyCatalog { category: VehicleCategory::Upsell })?;

        Ok(VehiclePair { comparable, upsell })
    }
}

struct Criteria {
    min_capacity: u32,
    transmission: Option<String>,
    price_ceiling: Decimal,
}

impl Criteria {
    fn from_preferences(
        preferences: &PreferenceSet,
        policy: &SelectionPolicy,
    ) -> Result<Self, DomainError> {
        let min_capacity = u32::try_from(preferences.passenger_requirement).map_err(|_| {
            DomainError::InvalidPreference(format!(
                "passenger_requirement must be >= 0, got {}",
                preferences.passenger_requirement
            ))
        })?;
        if preferences.budget < Decimal::ZERO {
            return Err(DomainError::InvalidPreference(format!(
                "budget must be >= 0, got {}",
                preferences.budget
            )));
        }

        Ok(Self {
            min_capacity,
            transmission: preferences.transmission_requirement.clone(),
            price_ceiling: policy.price_ceiling(preferences.budget),
        })
    }

    fn seats(&self, vehicle: &VehicleRecord) -> bool {
        vehicle.passenger_capacity >= self.min_capacity
    }

    fn transmission(&self, vehicle: &VehicleRecord) -> bool {
        self.transmission.as_deref().map_or(true, |required| vehicle.transmission_matches(required))
    }

    fn within_budget(&self, vehicle: &VehicleRecord) -> bool {
        vehicle.total_price <= self.price_ceiling
    }
}

fn non_empty_pool(
    catalog: &Catalog,
    category: VehicleCategory,
) -> Result<Vec<&VehicleRecord>, DomainError> {
    let pool: Vec<_> = catalog.pool(category).collect();
    if pool.is_empty() {
        return Err(DomainError::EmptyCatalog { category });
    }
    Ok(pool)
}

/// Exact, case-sensitive name match. Falls back to the whole pool when the
/// preferred name is absent or matches nothing.
fn narrow_to_preferred<'a>(
    pool: &[&'a VehicleRecord],
    preferred_name: Option<&str>,
) -> Vec<&'a VehicleRecord> {
    let Some(preferred_name) = preferred_name else {
        return pool.to_vec();
    };

    let named: Vec<_> =
        pool.iter().copied().filter(|vehicle| vehicle.name == preferred_name).collect();
    if named.is_empty() {
        pool.to_vec()
    } else {
        named
    }
}

fn apply_stages<'a>(pool: &[&'a VehicleRecord], criteria: &Criteria) -> Option<StagedVehicle<'a>> {
    if let Some(vehicle) = strict(pool, criteria) {
        return Some(StagedVehicle { vehicle, stage: SelectionStage::Strict });
    }
    if let Some(vehicle) = relax_budget(pool, criteria) {
        return Some(StagedVehicle { vehicle, stage: SelectionStage::RelaxedBudget });
    }
    if let Some(vehicle) = relax_transmission(pool, criteria) {
        return Some(StagedVehicle { vehicle, stage: SelectionStage::RelaxedTransmission });
    }
    fallback(pool).map(|vehicle| StagedVehicle { vehicle, stage: SelectionStage::Fallback })
}

fn strict<'a>(pool: &[&'a VehicleRecord], criteria: &Criteria) -> Option<&'a VehicleRecord> {
    first_max_by_price(pool.iter().copied().filter(|vehicle| {
        criteria.seats(vehicle) && criteria.transmission(vehicle) && criteria.within_budget(vehicle)
    }))
}

fn relax_budget<'a>(pool: &[&'a VehicleRecord], criteria: &Criteria) -> Option<&'a VehicleRecord> {
    first_min_by_price(
        pool.iter()
            .copied()
            .filter(|vehicle| criteria.seats(vehicle) && criteria.transmission(vehicle)),
    )
}

fn relax_transmission<'a>(
    pool: &[&'a VehicleRecord],
    criteria: &Criteria,
) -> Option<&'a VehicleRecord> {
    first_max_by_price(pool.iter().copied().filter(|vehicle| criteria.seats(vehicle)))
}

fn fallback<'a>(pool: &[&'a VehicleRecord]) -> Option<&'a VehicleRecord> {
    first_max_by_price(pool.iter().copied())
}

// `Iterator::max_by_key` keeps the last maximum; the cascade needs the first.
fn first_max_by_price<'a>(
    candidates: impl Iterator<Item = &'a VehicleRecord>,
) -> Option<&'a VehicleRecord> {
    candidates.fold(None, |best, candidate| match best {
        Some(current) if candidate.total_price <= current.total_price => Some(current),
        _ => Some(candidate),
    })
}

fn first_min_by_price<'a>(
    candidates: impl Iterator<Item = &'a VehicleRecord>,
) -> Option<&'a VehicleRecord> {
    candidates.fold(None, |best, candidate| match best {
        Some(current) if candidate.total_price >= current.total_price => Some(current),
        _ => Some(candidate),
    })
}
