pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod offer;

pub use domain::booking::BookingRequest;
pub use domain::preference::PreferenceSet;
pub use domain::protection::ProtectionPackage;
pub use domain::vehicle::{VehicleCategory, VehicleId, VehicleRecord};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{ConversationState, CustomerIntent, FlowEngine, FlowEvent, UpsellFlow};
pub use offer::catalog::Catalog;
pub use offer::format::{CarOffer, OfferResponse, ProtectionOffer};
pub use offer::policy::SelectionPolicy;
pub use offer::{DeterministicOfferRuntime, OfferEvaluation, OfferEvaluationInput, OfferRuntime};
