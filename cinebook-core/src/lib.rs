pub mod booking;
pub mod repository;
pub mod settings;

pub use booking::{Booking, BookingStatus, TicketLine, TransactionId};
pub use repository::{BookingStore, Catalog, SettingsRepository};
pub use settings::{BaseRates, Surcharges, SystemSettings, MAX_BASE_RATE, MAX_SURCHARGE};

use cinebook_shared::{BookingId, ParseError, SeatCode};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Seats unavailable: {}", join_seats(.0))]
    SeatUnavailable(Vec<SeatCode>),

    #[error("Seat {0} was taken before the booking could be committed, select seats again")]
    SeatConflict(SeatCode),

    #[error("Invalid ticket class: {0}")]
    InvalidTicketClass(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        CoreError::StorageError(err.to_string())
    }

    /// Only a seat lost between selection and commit is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::SeatConflict(_))
    }
}

impl From<ParseError> for CoreError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidSeatCode(code) => CoreError::NotFound { kind: "Seat", id: code },
            ParseError::InvalidTicketClass(class) => CoreError::InvalidTicketClass(class),
            other => CoreError::ValidationError(other.to_string()),
        }
    }
}

fn join_seats(seats: &[SeatCode]) -> String {
    seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type CoreResult<T> = Result<T, CoreError>;
