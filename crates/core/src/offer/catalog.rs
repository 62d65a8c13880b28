use serde::{Deserialize, Serialize};

use crate::domain::{
    protection::ProtectionPackage,
    vehicle::{VehicleCategory, VehicleRecord},
};

/// Vehicles and protection tiers in provider order. Order is significant:
/// selection tie-breaks resolve to the first record encountered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    vehicles: Vec<VehicleRecord>,
    protections: Vec<ProtectionPackage>,
}

impl Catalog {
    pub fn new(vehicles: Vec<VehicleRecord>, protections: Vec<ProtectionPackage>) -> Self {
        Self { vehicles, protections }
    }

    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    pub fn protections(&self) -> &[ProtectionPackage] {
        &self.protections
    }

    pub fn pool(&self, category: VehicleCategory) -> impl Iterator<Item = &VehicleRecord> + '_ {
        self.vehicles.iter().filter(move |vehicle| vehicle.is_in(category))
    }

    pub fn pool_len(&self, category: VehicleCategory) -> usize {
        self.pool(category).count()
    }

    pub fn contains(&self, vehicle: &VehicleRecord) -> bool {
        self.vehicles.iter().any(|candidate| candidate == vehicle)
    }
}
