use crate::{CoreError, CoreResult};
use chrono::{Datelike, NaiveDate, Weekday};
use cinebook_shared::{Money, TicketClass};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Highest accepted base rate for one ticket
pub const MAX_BASE_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Highest accepted surcharge fraction; `100` adds 100 times the base
pub const MAX_SURCHARGE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Base ticket price per ticket class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRates {
    pub adult: Money,
    pub child: Money,
    pub senior: Money,
}

impl BaseRates {
    pub fn validate(&self) -> CoreResult<()> {
        for (name, rate) in [("adult", self.adult), ("child", self.child), ("senior", self.senior)] {
            if rate.is_sign_negative() {
                return Err(CoreError::ValidationError(format!(
                    "{} base rate must not be negative: {}",
                    name, rate
                )));
            }
            if rate > MAX_BASE_RATE {
                return Err(CoreError::ValidationError(format!(
                    "{} base rate must not exceed {}: {}",
                    name, MAX_BASE_RATE, rate
                )));
            }
        }
        Ok(())
    }
}

/// Proportional surcharges, e.g. `0.20` adds 20% of the base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surcharges {
    pub premium_cinema: Decimal,
    pub blockbuster: Decimal,
    pub weekend: Decimal,
}

impl Surcharges {
    pub fn validate(&self) -> CoreResult<()> {
        for (name, rate) in [
            ("premium cinema", self.premium_cinema),
            ("blockbuster", self.blockbuster),
            ("weekend/holiday", self.weekend),
        ] {
            if rate.is_sign_negative() {
                return Err(CoreError::ValidationError(format!(
                    "{} surcharge must not be negative: {}",
                    name, rate
                )));
            }
            if rate > MAX_SURCHARGE {
                return Err(CoreError::ValidationError(format!(
                    "{} surcharge must not exceed {}: {}",
                    name, MAX_SURCHARGE, rate
                )));
            }
        }
        Ok(())
    }
}

/// Process-wide pricing settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSettings {
    pub base_rates: BaseRates,
    pub surcharges: Surcharges,
    pub holidays: BTreeSet<NaiveDate>,
}

impl SystemSettings {
    pub fn base_rate(&self, class: TicketClass) -> Money {
        match class {
            TicketClass::Adult => self.base_rates.adult,
            TicketClass::Child => self.base_rates.child,
            TicketClass::Senior => self.base_rates.senior,
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Saturday, Sunday, or a listed public holiday
    pub fn is_weekend_or_holiday(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.is_holiday(date)
    }

    /// Parse a holiday given as `YYYY-MM-DD`
    pub fn parse_holiday(raw: &str) -> CoreResult<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| CoreError::InvalidDate(raw.to_string()))
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            base_rates: BaseRates {
                adult: Decimal::new(1000, 2),
                child: Decimal::new(700, 2),
                senior: Decimal::new(600, 2),
            },
            surcharges: Surcharges {
                premium_cinema: Decimal::new(20, 2),
                blockbuster: Decimal::new(10, 2),
                weekend: Decimal::new(10, 2),
            },
            holidays: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_weekend_and_holiday_detection() {
        let mut settings = SystemSettings::default();
        let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();

        assert!(!settings.is_weekend_or_holiday(friday));
        assert!(settings.is_weekend_or_holiday(saturday));

        settings.holidays.insert(friday);
        assert!(settings.is_weekend_or_holiday(friday));
    }

    #[test]
    fn test_parse_holiday() {
        assert_eq!(
            SystemSettings::parse_holiday("2024-12-25").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
        assert!(matches!(
            SystemSettings::parse_holiday("25/12/2024"),
            Err(CoreError::InvalidDate(_))
        ));
        assert!(SystemSettings::parse_holiday("2024-02-30").is_err());
    }

    #[test]
    fn test_negative_rates_rejected() {
        let mut rates = SystemSettings::default().base_rates;
        assert!(rates.validate().is_ok());
        rates.child = dec!(-1);
        assert!(matches!(rates.validate(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_oversized_rates_rejected() {
        let mut rates = SystemSettings::default().base_rates;
        rates.adult = MAX_BASE_RATE;
        assert!(rates.validate().is_ok());

        rates.adult = Decimal::MAX;
        assert!(matches!(rates.validate(), Err(CoreError::ValidationError(_))));

        let mut surcharges = SystemSettings::default().surcharges;
        surcharges.weekend = MAX_SURCHARGE;
        assert!(surcharges.validate().is_ok());

        surcharges.weekend = dec!(100.01);
        assert!(matches!(surcharges.validate(), Err(CoreError::ValidationError(_))));
    }
}
