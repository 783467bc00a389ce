use cinebook_catalog::{PriceBreakdown, PricingContext};
use cinebook_core::TicketLine;
use cinebook_shared::{Cinema, Money, MovieFlags, SeatCode, Showtime, ShowtimeId};

/// Booking flow before any seat is chosen. Owned by the caller and free to
/// drop; nothing is reserved on its behalf.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub(crate) showtime: Showtime,
    pub(crate) cinema: Cinema,
    pub(crate) movie_flags: MovieFlags,
    pub(crate) customer_ref: String,
}

impl BookingDraft {
    pub fn showtime(&self) -> &Showtime {
        &self.showtime
    }

    pub fn cinema(&self) -> &Cinema {
        &self.cinema
    }

    pub fn customer_ref(&self) -> &str {
        &self.customer_ref
    }

    pub fn pricing_context(&self) -> PricingContext {
        PricingContext {
            cinema_class: self.cinema.class,
            movie_flags: self.movie_flags,
            starts_at: self.showtime.starts_at,
        }
    }
}

/// Seats checked and priced, ready to commit
#[derive(Debug, Clone)]
pub struct PricedBooking {
    pub(crate) draft: BookingDraft,
    pub(crate) lines: Vec<TicketLine>,
    pub(crate) price: PriceBreakdown,
}

impl PricedBooking {
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn showtime_id(&self) -> &ShowtimeId {
        &self.draft.showtime.id
    }

    pub fn lines(&self) -> &[TicketLine] {
        &self.lines
    }

    pub fn seats(&self) -> Vec<SeatCode> {
        self.lines.iter().map(|line| line.seat).collect()
    }

    pub fn price(&self) -> &PriceBreakdown {
        &self.price
    }

    pub fn total(&self) -> Money {
        self.price.total
    }
}
