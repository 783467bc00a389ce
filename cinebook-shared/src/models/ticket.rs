use super::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pricing category of a single seat purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketClass {
    Adult,
    Child,
    Senior,
}

impl TicketClass {
    pub const ALL: [TicketClass; 3] = [TicketClass::Adult, TicketClass::Child, TicketClass::Senior];
}

impl FromStr for TicketClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adult" => Ok(TicketClass::Adult),
            "child" => Ok(TicketClass::Child),
            "senior" | "senior citizen" => Ok(TicketClass::Senior),
            _ => Err(ParseError::InvalidTicketClass(s.to_string())),
        }
    }
}

impl fmt::Display for TicketClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TicketClass::Adult => "Adult",
            TicketClass::Child => "Child",
            TicketClass::Senior => "Senior",
        };
        f.write_str(label)
    }
}
