//! Wire shapes of the rental booking API. Only the fields the offer engine
//! reads are modelled; everything else in the payload is ignored.

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct BookingCreated {
    pub id: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct VehiclesPayload {
    #[serde(default)]
    pub deals: Vec<Deal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Deal {
    pub vehicle: RawVehicle,
    #[serde(default)]
    pub pricing: Pricing,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub passengers_count: Option<u32>,
    #[serde(default)]
    pub transmission_type: Option<String>,
    #[serde(default)]
    pub is_new_car: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default)]
    pub display_price: Option<Amount>,
    #[serde(default)]
    pub total_price: Option<Amount>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Amount {
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionsPayload {
    #[serde(default)]
    pub protection_packages: Vec<RawProtection>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawProtection {
    pub name: String,
    #[serde(default)]
    pub includes: Vec<Include>,
    #[serde(default)]
    pub price: ProtectionPrice,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Include {
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionPrice {
    #[serde(default)]
    pub display_price: Option<Amount>,
}

impl Amount {
    pub fn or_zero(amount: Option<&Amount>) -> Decimal {
        amount.and_then(|amount| amount.amount).unwrap_or(Decimal::ZERO)
    }
}
