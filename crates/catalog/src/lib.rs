//! Rental catalog acquisition.
//!
//! Vehicles and protection tiers come from the rental provider's booking API
//! (`client`), are flattened into core records (`simplify`), persisted as a
//! JSON cache (`cache`) and published to request handlers as immutable
//! snapshots (`store`).

pub mod cache;
pub mod client;
pub mod error;
pub mod raw;
pub mod simplify;
pub mod store;

pub use cache::CatalogCache;
pub use client::{CatalogSource, RentalApiClient};
pub use error::CatalogError;
pub use store::{CatalogSnapshot, CatalogStore, SnapshotOrigin};
