use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An insurance / damage-waiver tier offered alongside the vehicle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionPackage {
    pub name: String,
    pub summary: String,
    pub cost: Decimal,
}
