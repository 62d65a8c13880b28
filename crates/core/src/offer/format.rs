use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{protection::ProtectionPackage, vehicle::VehicleRecord};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarOffer {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub price_delta: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionOffer {
    pub name: String,
    pub price: String,
    pub description: String,
}

/// Payload returned to the front end for one booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferResponse {
    pub upsell_car: CarOffer,
    pub normal_car: CarOffer,
    pub protection: ProtectionOffer,
}

pub fn format_car_offer(vehicle: &VehicleRecord) -> CarOffer {
    let price_delta = if vehicle.extra_cost > Decimal::ZERO {
        format!("+${}/day", vehicle.extra_cost.normalize())
    } else {
        "Same Price".to_string()
    };

    CarOffer {
        id: vehicle.id.0.clone(),
        name: vehicle.name.clone(),
        image: vehicle.image_ref.clone(),
        price_delta,
        description: format!("{} with category {}", vehicle.name, vehicle.category),
    }
}

pub fn format_protection_offer(package: &ProtectionPackage) -> ProtectionOffer {
    ProtectionOffer {
        name: package.name.clone(),
        price: format!("${}/day", package.cost.normalize()),
        description: package.summary.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_car_offer, format_protection_offer};
    use crate::domain::protection::ProtectionPackage;
    use crate::domain::vehicle::{VehicleCategory, VehicleId, VehicleRecord};

    fn vehicle(extra_cost: Decimal) -> VehicleRecord {
        VehicleRecord {
            id: VehicleId("veh-42".to_string()),
            name: "Audi A6".to_string(),
            category: VehicleCategory::Upsell,
            passenger_capacity: 5,
            transmission: "automatic".to_string(),
            total_price: Decimal::new(120, 0),
            extra_cost,
            is_new: true,
            image_ref: Some("https://img.example/a6.png".to_string()),
        }
    }

    #[test]
    fn car_offer_shows_daily_delta_when_extra_cost_is_positive() {
        let offer = format_car_offer(&vehicle(Decimal::new(1250, 2)));

        assert_eq!(offer.id, "veh-42");
        assert_eq!(offer.price_delta, "+$12.5/day");
        assert_eq!(offer.description, "Audi A6 with category recommended_upsell");
        assert_eq!(offer.image.as_deref(), Some("https://img.example/a6.png"));
    }

    #[test]
    fn car_offer_shows_same_price_without_extra_cost() {
        assert_eq!(format_car_offer(&vehicle(Decimal::ZERO)).price_delta, "Same Price");
        assert_eq!(format_car_offer(&vehicle(Decimal::new(-3, 0))).price_delta, "Same Price");
    }

    #[test]
    fn protection_offer_renders_daily_price() {
        let offer = format_protection_offer(&ProtectionPackage {
            name: "Smart Protection".to_string(),
            summary: "Collision damage covered. Theft covered.".to_string(),
            cost: Decimal::new(1500, 2),
        });

        assert_eq!(offer.price, "$15/day");
        assert_eq!(offer.description, "Collision damage covered. Theft covered.");
    }
}
