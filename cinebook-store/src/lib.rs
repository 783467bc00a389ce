pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod flat_file;
pub mod records;
pub mod settings_store;

pub use booking_repo::{FileBookingStore, InMemoryBookingStore};
pub use catalog_repo::load_catalog;
pub use settings_store::{FileSettingsRepository, SettingsStore};
