use cinebook_core::CoreResult;
use cinebook_order::BookingEngine;
use cinebook_store::app_config::DataConfig;
use cinebook_store::{load_catalog, FileBookingStore, FileSettingsRepository, SettingsStore};
use std::sync::Arc;

/// Long-lived services behind every command
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BookingEngine>,
}

impl AppState {
    pub async fn init(data: &DataConfig) -> CoreResult<Self> {
        let catalog = Arc::new(load_catalog(&data.catalog_path()).await?);
        let settings = SettingsStore::open(Arc::new(FileSettingsRepository::new(data.settings_path()))).await?;
        let store = FileBookingStore::open(data.bookings_path()).await?;

        let engine = BookingEngine::hydrate(catalog, Arc::new(settings), Arc::new(store)).await?;
        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}
