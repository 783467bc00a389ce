pub mod engine;
pub mod models;
pub mod reports;

pub use engine::BookingEngine;
pub use models::{BookingDraft, PricedBooking};
pub use reports::{sales_by_movie, MovieSales};
