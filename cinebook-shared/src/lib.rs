pub mod models;
pub mod money;
pub mod pii;

pub use models::{
    BookingId, Cinema, CinemaClass, CinemaId, Movie, MovieFlags, MovieId, MovieStatus,
    ParseError, SeatCode, Showtime, ShowtimeId, TicketClass,
};
pub use money::Money;
pub use pii::Masked;
