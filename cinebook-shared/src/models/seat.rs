use super::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest row count a grid can have, one letter per row
pub const MAX_ROWS: usize = 26;

/// Seat position written as a row letter followed by a 1-based column, e.g. `A1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatCode {
    row: u8,
    column: u16,
}

impl SeatCode {
    /// Build from zero-based row and column indexes
    pub fn from_indexes(row: usize, column: usize) -> Option<Self> {
        if row >= MAX_ROWS || column >= u16::MAX as usize {
            return None;
        }
        Some(Self {
            row: row as u8,
            column: column as u16 + 1,
        })
    }

    /// Zero-based row index
    pub fn row_index(&self) -> usize {
        self.row as usize
    }

    /// Zero-based column index
    pub fn column_index(&self) -> usize {
        self.column as usize - 1
    }

    pub fn row_letter(&self) -> char {
        (b'A' + self.row) as char
    }
}

impl FromStr for SeatCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let invalid = || ParseError::InvalidSeatCode(s.to_string());

        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return Err(invalid());
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let column: u16 = digits.parse().map_err(|_| invalid())?;
        if column == 0 {
            return Err(invalid());
        }

        Ok(Self {
            row: letter as u8 - b'A',
            column,
        })
    }
}

impl fmt::Display for SeatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.column)
    }
}

impl Serialize for SeatCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
