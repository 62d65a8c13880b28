use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One customer's stated requirements for a single selection request.
///
/// `passenger_requirement` is signed so that a negative inbound value reaches
/// the selection engine and is rejected there instead of being lost in a cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSet {
    pub preferred_vehicle_name: Option<String>,
    pub passenger_requirement: i32,
    pub transmission_requirement: Option<String>,
    pub budget: Decimal,
}

impl PreferenceSet {
    pub fn new(passenger_requirement: i32, budget: Decimal) -> Self {
        Self {
            preferred_vehicle_name: None,
            passenger_requirement,
            transmission_requirement: None,
            budget,
        }
    }

    pub fn with_preferred_vehicle(mut self, name: impl Into<String>) -> Self {
        self.preferred_vehicle_name = Some(name.into());
        self
    }

    pub fn with_transmission(mut self, transmission: impl Into<String>) -> Self {
        self.transmission_requirement = Some(transmission.into());
        self
    }
}
