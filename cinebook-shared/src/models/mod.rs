pub mod ids;
pub mod seat;
pub mod ticket;
pub mod catalog;

pub use ids::{BookingId, CinemaId, MovieId, ShowtimeId};
pub use seat::SeatCode;
pub use ticket::TicketClass;
pub use catalog::{Cinema, CinemaClass, Movie, MovieFlags, MovieStatus, Showtime};

/// Errors raised while parsing user-facing codes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid seat code: {0}")]
    InvalidSeatCode(String),

    #[error("Invalid ticket class: {0}")]
    InvalidTicketClass(String),

    #[error("Invalid cinema code: {0}")]
    InvalidCinemaCode(String),
}
