use chrono::{DateTime, NaiveDateTime, Utc};
use cinebook_shared::{BookingId, Cinema, CinemaId, Money, MovieId, SeatCode, ShowtimeId, TicketClass};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status after commit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => f.pad("CONFIRMED"),
            BookingStatus::Cancelled => f.pad("CANCELLED"),
        }
    }
}

/// One seat and the ticket class it was sold as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLine {
    pub seat: SeatCode,
    pub ticket_class: TicketClass,
}

impl TicketLine {
    pub fn new(seat: SeatCode, ticket_class: TicketClass) -> Self {
        Self { seat, ticket_class }
    }
}

/// Human-readable booking reference: `CCCYYYYMMDDhhmm`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Cinema code followed by the showtime's local start time
    pub fn for_showtime(cinema: &Cinema, starts_at: NaiveDateTime) -> crate::CoreResult<Self> {
        Cinema::validate_code(&cinema.code)?;
        Ok(Self(format!("{}{}", cinema.code, starts_at.format("%Y%m%d%H%M"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a stored value, checking the layout
    pub fn parse(raw: &str) -> Option<Self> {
        let (code, stamp) = raw.split_at_checked(3)?;
        let well_formed = Cinema::validate_code(code).is_ok()
            && stamp.len() == 12
            && NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M").is_ok();
        well_formed.then(|| Self(raw.to_string()))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A committed ticket purchase. Lines and price are a snapshot taken at
/// commit time; only the status changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub transaction_id: TransactionId,
    pub customer_ref: String,
    pub showtime_id: ShowtimeId,
    pub movie_id: MovieId,
    pub cinema_id: CinemaId,
    pub lines: Vec<TicketLine>,
    pub total_price: Money,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn seats(&self) -> Vec<SeatCode> {
        self.lines.iter().map(|line| line.seat).collect()
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn ticket_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cinebook_shared::CinemaClass;

    fn cinema(code: &str) -> Cinema {
        Cinema {
            id: CinemaId::new("C1"),
            name: "Hall 1".to_string(),
            code: code.to_string(),
            class: CinemaClass::Standard,
        }
    }

    #[test]
    fn test_transaction_id_format() {
        let starts_at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        let txn = TransactionId::for_showtime(&cinema("GVP"), starts_at).unwrap();
        assert_eq!(txn.as_str(), "GVP202403151930");
        assert_eq!(TransactionId::parse("GVP202403151930"), Some(txn));
    }

    #[test]
    fn test_transaction_id_rejects_bad_code() {
        let starts_at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert!(TransactionId::for_showtime(&cinema("G1"), starts_at).is_err());
        assert!(TransactionId::parse("GVP2024031519").is_none());
        assert!(TransactionId::parse("gvp202403151930").is_none());
    }
}
