use upsell_core::domain::protection::ProtectionPackage;
use upsell_core::domain::vehicle::{VehicleCategory, VehicleId, VehicleRecord};

use crate::raw::{Amount, Deal, ProtectionsPayload, RawProtection, VehiclesPayload};

pub fn simplify_vehicles(payload: VehiclesPayload) -> Vec<VehicleRecord> {
    payload.deals.into_iter().map(simplify_deal).collect()
}

pub fn simplify_protections(payload: ProtectionsPayload) -> Vec<ProtectionPackage> {
    payload.protection_packages.into_iter().map(simplify_protection).collect()
}

fn simplify_deal(deal: Deal) -> VehicleRecord {
    let Deal { vehicle, pricing } = deal;
    let category =
        if vehicle.is_recommended { VehicleCategory::Upsell } else { VehicleCategory::Comparable };

    VehicleRecord {
        id: VehicleId(vehicle.id),
        name: format!("{} {}", vehicle.brand, vehicle.model),
        category,
        passenger_capacity: vehicle.passengers_count.unwrap_or(0),
        transmission: vehicle.transmission_type.unwrap_or_default(),
        total_price: Amount::or_zero(pricing.total_price.as_ref()),
        extra_cost: Amount::or_zero(pricing.display_price.as_ref()),
        is_new: vehicle.is_new_car,
        image_ref: vehicle.images.into_iter().next(),
    }
}

fn simplify_protection(package: RawProtection) -> ProtectionPackage {
    let summary = package
        .includes
        .iter()
        .map(|include| include.description.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    ProtectionPackage {
        name: package.name,
        summary,
        cost: Amount::or_zero(package.price.display_price.as_ref()),
    }
}
