use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::preference::PreferenceSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientData {
    pub name: String,
    pub age: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationData {
    pub pickup_location_id: String,
    pub preferred_car: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuggageTier {
    Light,
    Medium,
    Heavy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesData {
    pub passengers: i32,
    pub doors: u32,
    pub luggage: LuggageTier,
    #[serde(default)]
    pub transmission: Option<String>,
    pub budget: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonsData {
    pub gps: bool,
    pub baby_seat: bool,
    pub additional_driver: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub language: String,
}

/// Inbound booking request as posted by the front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub client: ClientData,
    pub reservation: ReservationData,
    pub preferences: PreferencesData,
    pub addons: AddonsData,
    pub meta: MetaData,
}

impl BookingRequest {
    /// Projects the fields the selection engine consumes. Everything else in
    /// the request is carried for the agent and the front end only.
    pub fn preference_set(&self) -> PreferenceSet {
        PreferenceSet {
            preferred_vehicle_name: Some(self.reservation.preferred_car.clone()),
            passenger_requirement: self.preferences.passengers,
            transmission_requirement: self.preferences.transmission.clone(),
            budget: self.preferences.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{BookingRequest, LuggageTier};

    #[test]
    fn booking_request_parses_front_end_payload() {
        let payload = r#"{
            "client": {"name": "Alex", "age": 31},
            "reservation": {"pickup_location_id": "MUC-01", "preferred_car": "VW Golf"},
            "preferences": {
                "passengers": 4,
                "doors": 5,
                "luggage": "medium",
                "transmission": "automatic",
                "budget": 55.5
            },
            "addons": {"gps": true, "baby_seat": false, "additional_driver": false},
            "meta": {"language": "en"}
        }"#;

        let request: BookingRequest = serde_json::from_str(payload).expect("valid payload");
        let preferences = request.preference_set();

        assert_eq!(request.preferences.luggage, LuggageTier::Medium);
        assert_eq!(preferences.preferred_vehicle_name.as_deref(), Some("VW Golf"));
        assert_eq!(preferences.passenger_requirement, 4);
        assert_eq!(preferences.transmission_requirement.as_deref(), Some("automatic"));
        assert_eq!(preferences.budget, Decimal::new(555, 1));
    }

    #[test]
    fn transmission_is_optional() {
        let payload = r#"{
            "client": {"name": "Sam", "age": 45},
            "reservation": {"pickup_location_id": "BER-02", "preferred_car": "Any"},
            "preferences": {"passengers": 2, "doors": 3, "luggage": "light", "budget": 30},
            "addons": {"gps": false, "baby_seat": false, "additional_driver": false},
            "meta": {"language": "de"}
        }"#;

        let request: BookingRequest = serde_json::from_str(payload).expect("valid payload");
        assert!(request.preference_set().transmission_requirement.is_none());
    }
}
