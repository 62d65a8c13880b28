use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

/// Partition of the rental catalog. A vehicle belongs to exactly one pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    #[serde(rename = "same", alias = "comparable")]
    Comparable,
    #[serde(rename = "recommended_upsell", alias = "upsell")]
    Upsell,
}

impl VehicleCategory {
    /// Label used by the rental feed and echoed in offer descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comparable => "same",
            Self::Upsell => "recommended_upsell",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: VehicleId,
    #[serde(alias = "vehicle_name")]
    pub name: String,
    pub category: VehicleCategory,
    #[serde(alias = "passengers")]
    pub passenger_capacity: u32,
    pub transmission: String,
    pub total_price: Decimal,
    pub extra_cost: Decimal,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default, alias = "image")]
    pub image_ref: Option<String>,
}

impl VehicleRecord {
    pub fn is_in(&self, category: VehicleCategory) -> bool {
        self.category == category
    }

    pub fn transmission_matches(&self, required: &str) -> bool {
        self.transmission.to_lowercase() == required.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{VehicleCategory, VehicleId, VehicleRecord};

    #[test]
    fn category_uses_feed_vocabulary_and_accepts_aliases() {
        let same: VehicleCategory = serde_json::from_str("\"same\"").expect("same");
        let alias: VehicleCategory = serde_json::from_str("\"upsell\"").expect("alias");

        assert_eq!(same, VehicleCategory::Comparable);
        assert_eq!(alias, VehicleCategory::Upsell);
        assert_eq!(
            serde_json::to_string(&VehicleCategory::Upsell).expect("serialize"),
            "\"recommended_upsell\""
        );
    }

    #[test]
    fn transmission_match_ignores_case() {
        let vehicle = VehicleRecord {
            id: VehicleId("v-1".to_string()),
            name: "BMW X1".to_string(),
            category: VehicleCategory::Comparable,
            passenger_capacity: 5,
            transmission: "Automatic".to_string(),
            total_price: Decimal::new(80, 0),
            extra_cost: Decimal::ZERO,
            is_new: false,
            image_ref: None,
        };

        assert!(vehicle.transmission_matches("AUTOMATIC"));
        assert!(!vehicle.transmission_matches("manual"));
    }
}
