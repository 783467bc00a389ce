//! On-disk record layouts. These are decoupled from the in-memory types so
//! the file formats can stay stable while the domain model evolves.

use chrono::{DateTime, Utc};
use cinebook_core::{
    BaseRates, Booking, BookingStatus, CoreError, CoreResult, Surcharges, SystemSettings,
    TicketLine, TransactionId,
};
use cinebook_shared::{BookingId, CinemaId, MovieId, SeatCode, ShowtimeId, TicketClass};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub adult_rate: Decimal,
    pub child_rate: Decimal,
    pub senior_rate: Decimal,
    pub premium_cinema_surcharge: Decimal,
    pub blockbuster_surcharge: Decimal,
    pub weekend_surcharge: Decimal,
    /// Sorted `YYYY-MM-DD` dates
    #[serde(default)]
    pub holidays: Vec<String>,
}

impl From<&SystemSettings> for SettingsRecord {
    fn from(settings: &SystemSettings) -> Self {
        Self {
            adult_rate: settings.base_rates.adult,
            child_rate: settings.base_rates.child,
            senior_rate: settings.base_rates.senior,
            premium_cinema_surcharge: settings.surcharges.premium_cinema,
            blockbuster_surcharge: settings.surcharges.blockbuster,
            weekend_surcharge: settings.surcharges.weekend,
            holidays: settings
                .holidays
                .iter()
                .map(|date| date.format("%Y-%m-%d").to_string())
                .collect(),
        }
    }
}

impl TryFrom<SettingsRecord> for SystemSettings {
    type Error = CoreError;

    fn try_from(record: SettingsRecord) -> CoreResult<Self> {
        let base_rates = BaseRates {
            adult: record.adult_rate,
            child: record.child_rate,
            senior: record.senior_rate,
        };
        let surcharges = Surcharges {
            premium_cinema: record.premium_cinema_surcharge,
            blockbuster: record.blockbuster_surcharge,
            weekend: record.weekend_surcharge,
        };
        base_rates.validate()?;
        surcharges.validate()?;

        let holidays = record
            .holidays
            .iter()
            .map(|raw| SystemSettings::parse_holiday(raw))
            .collect::<CoreResult<_>>()?;

        Ok(SystemSettings {
            base_rates,
            surcharges,
            holidays,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub seat: String,
    pub ticket_class: TicketClass,
}

/// One line of the bookings file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub transaction_id: String,
    pub customer_ref: String,
    pub showtime_id: String,
    pub movie_id: String,
    pub cinema_id: String,
    pub tickets: Vec<TicketRecord>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<&Booking> for BookingRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.0,
            transaction_id: booking.transaction_id.to_string(),
            customer_ref: booking.customer_ref.clone(),
            showtime_id: booking.showtime_id.to_string(),
            movie_id: booking.movie_id.to_string(),
            cinema_id: booking.cinema_id.to_string(),
            tickets: booking
                .lines
                .iter()
                .map(|line| TicketRecord {
                    seat: line.seat.to_string(),
                    ticket_class: line.ticket_class,
                })
                .collect(),
            total_price: booking.total_price,
            status: booking.status,
            created_at: booking.created_at,
            cancelled_at: booking.cancelled_at,
        }
    }
}

impl TryFrom<BookingRecord> for Booking {
    type Error = CoreError;

    fn try_from(record: BookingRecord) -> CoreResult<Self> {
        let id = record.id;
        let corrupt = |what: &str| {
            CoreError::StorageError(format!("Corrupt booking record {}: {}", id, what))
        };

        let transaction_id = TransactionId::parse(&record.transaction_id)
            .ok_or_else(|| corrupt("transaction id"))?;
        let lines = record
            .tickets
            .iter()
            .map(|ticket| {
                ticket
                    .seat
                    .parse::<SeatCode>()
                    .map(|seat| TicketLine::new(seat, ticket.ticket_class))
                    .map_err(|_| corrupt("seat code"))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Booking {
            id: BookingId(id),
            transaction_id,
            customer_ref: record.customer_ref,
            showtime_id: ShowtimeId::new(record.showtime_id),
            movie_id: MovieId::new(record.movie_id),
            cinema_id: CinemaId::new(record.cinema_id),
            lines,
            total_price: record.total_price,
            status: record.status,
            created_at: record.created_at,
            cancelled_at: record.cancelled_at,
        })
    }
}
