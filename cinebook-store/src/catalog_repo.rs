use crate::flat_file::read_optional;
use cinebook_catalog::{CatalogData, InMemoryCatalog};
use cinebook_core::{CoreError, CoreResult};
use std::path::Path;
use tracing::info;

/// Load the movie/cinema/showtime seed file
pub async fn load_catalog(path: &Path) -> CoreResult<InMemoryCatalog> {
    let contents = read_optional(path).await?.ok_or_else(|| {
        CoreError::StorageError(format!("Catalog file not found: {}", path.display()))
    })?;

    let data: CatalogData = serde_json::from_str(&contents).map_err(|e| {
        CoreError::StorageError(format!("Invalid catalog file {}: {}", path.display(), e))
    })?;
    info!(
        cinemas = data.cinemas.len(),
        movies = data.movies.len(),
        showtimes = data.showtimes.len(),
        "Catalog loaded"
    );

    InMemoryCatalog::new(data)
}
