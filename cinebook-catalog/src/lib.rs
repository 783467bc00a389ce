pub mod catalog;
pub mod pricing;
pub mod seating;

pub use catalog::{CatalogData, InMemoryCatalog};
pub use pricing::{AppliedSurcharge, PriceBreakdown, PricingContext, PricingEngine, SurchargeKind};
pub use seating::{SeatingError, SeatingGrid};
