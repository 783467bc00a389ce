use super::{CinemaId, MovieId, ParseError, ShowtimeId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Cinema hall class, drives the premium surcharge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CinemaClass {
    Standard,
    Premium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cinema {
    pub id: CinemaId,
    pub name: String,
    /// Three upper-case letters, used as the transaction id prefix
    pub code: String,
    pub class: CinemaClass,
}

impl Cinema {
    /// Ensure the cinema code is exactly three ASCII letters
    pub fn validate_code(code: &str) -> Result<(), ParseError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(())
        } else {
            Err(ParseError::InvalidCinemaCode(code.to_string()))
        }
    }
}

/// Movie attributes that feed into pricing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFlags {
    #[serde(default)]
    pub is_blockbuster: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovieStatus {
    ComingSoon,
    Preview,
    #[default]
    NowShowing,
    EndOfShowing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(flatten)]
    pub flags: MovieFlags,
    #[serde(default)]
    pub status: MovieStatus,
}

/// A scheduled screening of one movie in one cinema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    pub id: ShowtimeId,
    pub movie_id: MovieId,
    pub cinema_id: CinemaId,
    /// Local wall-clock start time
    pub starts_at: NaiveDateTime,
    pub rows: usize,
    pub columns: usize,
}
