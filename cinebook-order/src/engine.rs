use crate::models::{BookingDraft, PricedBooking};
use crate::reports::{sales_by_movie, MovieSales};
use chrono::Utc;
use cinebook_catalog::{PriceBreakdown, PricingEngine, SeatingGrid};
use cinebook_core::{
    Booking, BookingStatus, BookingStore, Catalog, CoreError, CoreResult, TicketLine,
    TransactionId,
};
use cinebook_shared::{BookingId, Masked, ShowtimeId, TicketClass};
use cinebook_store::SettingsStore;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Drives a booking from seat selection to a committed, persisted record.
///
/// Each showtime's grid sits behind its own lock. `commit` re-checks and
/// reserves under that lock, so two commits racing for a seat cannot both win.
pub struct BookingEngine {
    catalog: Arc<dyn Catalog>,
    settings: Arc<SettingsStore>,
    store: Arc<dyn BookingStore>,
    grids: HashMap<ShowtimeId, Mutex<SeatingGrid>>,
    cancellations: tokio::sync::Mutex<()>,
}

impl BookingEngine {
    /// Engine with an empty grid for every catalog showtime
    pub fn new(
        catalog: Arc<dyn Catalog>,
        settings: Arc<SettingsStore>,
        store: Arc<dyn BookingStore>,
    ) -> CoreResult<Self> {
        let grids = catalog
            .showtimes()
            .into_iter()
            .map(|showtime| {
                SeatingGrid::new(showtime.rows, showtime.columns)
                    .map(|grid| (showtime.id.clone(), Mutex::new(grid)))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            catalog,
            settings,
            store,
            grids,
            cancellations: tokio::sync::Mutex::new(()),
        })
    }

    /// Engine whose grids reflect every confirmed booking already stored
    pub async fn hydrate(
        catalog: Arc<dyn Catalog>,
        settings: Arc<SettingsStore>,
        store: Arc<dyn BookingStore>,
    ) -> CoreResult<Self> {
        let engine = Self::new(catalog, settings, store)?;

        let mut replayed = 0;
        for booking in engine.store.list_all().await? {
            if !booking.is_active() {
                continue;
            }
            let Some(grid) = engine.grids.get(&booking.showtime_id) else {
                warn!(
                    booking_id = %booking.id,
                    showtime_id = %booking.showtime_id,
                    "Stored booking refers to a showtime missing from the catalog"
                );
                continue;
            };

            lock(grid).reserve(&booking.seats()).map_err(|err| {
                CoreError::StorageError(format!(
                    "Booking {} overlaps another confirmed booking: {}",
                    booking.id, err
                ))
            })?;
            replayed += 1;
        }

        info!(bookings = replayed, "Seat state restored from booking store");
        Ok(engine)
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Open a booking flow for a showtime
    pub fn start_draft(&self, showtime_id: &ShowtimeId, customer_ref: &str) -> CoreResult<BookingDraft> {
        let customer_ref = customer_ref.trim();
        if customer_ref.is_empty() {
            return Err(CoreError::ValidationError("Customer reference is required".to_string()));
        }

        let showtime = self
            .catalog
            .showtime(showtime_id)
            .ok_or_else(|| CoreError::not_found("Showtime", showtime_id))?
            .clone();
        let cinema = self
            .catalog
            .cinema(&showtime.cinema_id)
            .ok_or_else(|| CoreError::not_found("Cinema", &showtime.cinema_id))?
            .clone();
        let movie_flags = self.catalog.movie_flags(&showtime.movie_id)?;

        Ok(BookingDraft {
            showtime,
            cinema,
            movie_flags,
            customer_ref: customer_ref.to_string(),
        })
    }

    /// Check the seats without reserving them and price the selection.
    /// May be called repeatedly on the same draft.
    pub fn select_seats(&self, draft: &BookingDraft, lines: Vec<TicketLine>) -> CoreResult<PricedBooking> {
        if lines.is_empty() {
            return Err(CoreError::ValidationError("Select at least one seat".to_string()));
        }

        let mut seen = HashSet::with_capacity(lines.len());
        if let Some(dup) = lines.iter().find(|line| !seen.insert(line.seat)) {
            return Err(CoreError::ValidationError(format!(
                "Seat {} selected more than once",
                dup.seat
            )));
        }

        let seats: Vec<_> = lines.iter().map(|line| line.seat).collect();
        lock(self.grid(&draft.showtime.id)?).check_available(&seats)?;

        let classes: Vec<TicketClass> = lines.iter().map(|line| line.ticket_class).collect();
        let price = PricingEngine::new(self.settings.get()).price(&classes, &draft.pricing_context());

        Ok(PricedBooking {
            draft: draft.clone(),
            lines,
            price,
        })
    }

    /// Reserve the seats and persist the booking.
    ///
    /// Fails with `SeatConflict` when a seat was taken after selection; the
    /// caller has to select seats again.
    pub async fn commit(&self, priced: PricedBooking) -> CoreResult<Booking> {
        let draft = &priced.draft;
        let seats = priced.seats();
        let transaction_id = TransactionId::for_showtime(&draft.cinema, draft.showtime.starts_at)?;
        let grid = self.grid(&draft.showtime.id)?;

        let reserved = lock(grid).reserve(&seats);
        if let Err(err) = reserved {
            warn!(
                showtime_id = %draft.showtime.id,
                customer = %Masked(draft.customer_ref.as_str()),
                "Seat taken between selection and commit: {}",
                err
            );
            return Err(err.into());
        }

        let booking = Booking {
            id: BookingId::new(),
            transaction_id,
            customer_ref: draft.customer_ref.clone(),
            showtime_id: draft.showtime.id.clone(),
            movie_id: draft.showtime.movie_id.clone(),
            cinema_id: draft.showtime.cinema_id.clone(),
            lines: priced.lines.clone(),
            total_price: priced.price.total,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            cancelled_at: None,
        };

        if let Err(err) = self.store.save(&booking).await {
            // Undo the reservation so a failed write leaves no trace
            if let Err(release_err) = lock(grid).release(&seats) {
                warn!("Failed to release seats after aborted commit: {}", release_err);
            }
            return Err(err);
        }

        info!(
            booking_id = %booking.id,
            transaction_id = %booking.transaction_id,
            customer = %Masked(booking.customer_ref.as_str()),
            seats = booking.ticket_count(),
            total = %booking.total_price,
            "Booking committed"
        );
        Ok(booking)
    }

    /// Void a committed booking and free its seats. The record is kept.
    pub async fn cancel(&self, booking_id: BookingId) -> CoreResult<Booking> {
        let _guard = self.cancellations.lock().await;

        let mut booking = self.find_booking(booking_id).await?;
        if !booking.is_active() {
            return Err(CoreError::AlreadyCancelled(booking_id));
        }

        let at = Utc::now();
        self.store
            .update_status(booking_id, BookingStatus::Cancelled, at)
            .await?;

        match self.grids.get(&booking.showtime_id) {
            Some(grid) => lock(grid).release(&booking.seats())?,
            None => warn!(showtime_id = %booking.showtime_id, "Cancelled booking for unknown showtime"),
        }

        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(at);
        info!(booking_id = %booking.id, transaction_id = %booking.transaction_id, "Booking cancelled");
        Ok(booking)
    }

    pub async fn find_booking(&self, booking_id: BookingId) -> CoreResult<Booking> {
        self.store
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Booking", booking_id))
    }

    /// Booking history, newest first
    pub async fn bookings_for_customer(&self, customer_ref: &str) -> CoreResult<Vec<Booking>> {
        let mut bookings = self.store.list_by_customer(customer_ref.trim()).await?;
        // Stores return insertion order; reversing first keeps ties newest first
        bookings.reverse();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    /// Snapshot of a showtime's seats
    pub fn seat_map(&self, showtime_id: &ShowtimeId) -> CoreResult<SeatingGrid> {
        Ok(lock(self.grid(showtime_id)?).clone())
    }

    /// Price tickets for a showtime without choosing seats
    pub fn quote(&self, showtime_id: &ShowtimeId, tickets: &[TicketClass]) -> CoreResult<PriceBreakdown> {
        let showtime = self
            .catalog
            .showtime(showtime_id)
            .ok_or_else(|| CoreError::not_found("Showtime", showtime_id))?;
        let context = cinebook_catalog::PricingContext {
            cinema_class: self.catalog.cinema_class(&showtime.cinema_id)?,
            movie_flags: self.catalog.movie_flags(&showtime.movie_id)?,
            starts_at: showtime.starts_at,
        };
        Ok(PricingEngine::new(self.settings.get()).price(tickets, &context))
    }

    /// Ticket sales per movie over confirmed bookings
    pub async fn sales_report(&self) -> CoreResult<Vec<MovieSales>> {
        let bookings = self.store.list_all().await?;
        Ok(sales_by_movie(&bookings, self.catalog.as_ref()))
    }

    fn grid(&self, showtime_id: &ShowtimeId) -> CoreResult<&Mutex<SeatingGrid>> {
        self.grids
            .get(showtime_id)
            .ok_or_else(|| CoreError::not_found("Showtime", showtime_id))
    }
}

fn lock(grid: &Mutex<SeatingGrid>) -> MutexGuard<'_, SeatingGrid> {
    grid.lock().unwrap_or_else(PoisonError::into_inner)
}
