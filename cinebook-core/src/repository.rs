use crate::booking::{Booking, BookingStatus};
use crate::settings::SystemSettings;
use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cinebook_shared::{
    BookingId, Cinema, CinemaClass, CinemaId, Movie, MovieFlags, MovieId, Showtime, ShowtimeId,
};

/// Persistence for committed bookings
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn save(&self, booking: &Booking) -> CoreResult<BookingId>;

    async fn find_by_id(&self, id: BookingId) -> CoreResult<Option<Booking>>;

    async fn list_by_customer(&self, customer_ref: &str) -> CoreResult<Vec<Booking>>;

    async fn list_all(&self) -> CoreResult<Vec<Booking>>;

    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
        at: DateTime<Utc>,
    ) -> CoreResult<()>;
}

/// Durable record behind the settings store
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// `None` when nothing has been saved yet
    async fn load(&self) -> CoreResult<Option<SystemSettings>>;

    async fn save(&self, settings: &SystemSettings) -> CoreResult<()>;
}

/// Read-only movie, cinema and showtime lookup
pub trait Catalog: Send + Sync {
    fn showtime(&self, id: &ShowtimeId) -> Option<&Showtime>;

    fn showtimes(&self) -> Vec<&Showtime>;

    fn movie(&self, id: &MovieId) -> Option<&Movie>;

    fn movies(&self) -> Vec<&Movie>;

    fn cinema(&self, id: &CinemaId) -> Option<&Cinema>;

    fn movie_flags(&self, id: &MovieId) -> CoreResult<MovieFlags> {
        self.movie(id)
            .map(|movie| movie.flags)
            .ok_or_else(|| CoreError::not_found("Movie", id))
    }

    fn cinema_class(&self, id: &CinemaId) -> CoreResult<CinemaClass> {
        self.cinema(id)
            .map(|cinema| cinema.class)
            .ok_or_else(|| CoreError::not_found("Cinema", id))
    }
}
