use chrono::NaiveDateTime;
use cinebook_core::{CoreResult, SystemSettings};
use cinebook_shared::money::round_minor;
use cinebook_shared::{CinemaClass, Money, MovieFlags, TicketClass};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything about a showtime that affects its ticket price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingContext {
    pub cinema_class: CinemaClass,
    pub movie_flags: MovieFlags,
    /// Local start time of the showtime
    pub starts_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurchargeKind {
    PremiumCinema,
    Blockbuster,
    WeekendOrHoliday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedSurcharge {
    pub kind: SurchargeKind,
    pub rate: Decimal,
}

/// Result of a price computation, kept for display and audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub ticket_count: usize,
    pub base: Money,
    pub surcharges: Vec<AppliedSurcharge>,
    /// Sum of the applied surcharge rates
    pub multiplier: Decimal,
    pub total: Money,
}

/// Ticket price computation over one settings snapshot
pub struct PricingEngine {
    settings: SystemSettings,
}

impl PricingEngine {
    pub fn new(settings: SystemSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    /// Sum of the base rate of every ticket
    pub fn base_price(&self, tickets: &[TicketClass]) -> Money {
        tickets
            .iter()
            .map(|class| self.settings.base_rate(*class))
            .sum()
    }

    /// Surcharges that apply to a showtime, in a fixed order
    pub fn applicable_surcharges(&self, context: &PricingContext) -> Vec<AppliedSurcharge> {
        let rates = &self.settings.surcharges;
        let mut applied = Vec::new();

        if context.cinema_class == CinemaClass::Premium {
            applied.push(AppliedSurcharge {
                kind: SurchargeKind::PremiumCinema,
                rate: rates.premium_cinema,
            });
        }

        if context.movie_flags.is_blockbuster {
            applied.push(AppliedSurcharge {
                kind: SurchargeKind::Blockbuster,
                rate: rates.blockbuster,
            });
        }

        // Applied once, even for a holiday that falls on a weekend
        if self.settings.is_weekend_or_holiday(context.starts_at.date()) {
            applied.push(AppliedSurcharge {
                kind: SurchargeKind::WeekendOrHoliday,
                rate: rates.weekend,
            });
        }

        applied
    }

    /// Price one ticket per entry of `tickets`
    pub fn price(&self, tickets: &[TicketClass], context: &PricingContext) -> PriceBreakdown {
        let base = self.base_price(tickets);
        let surcharges = self.applicable_surcharges(context);
        let multiplier: Decimal = surcharges.iter().map(|s| s.rate).sum();
        let total = round_minor(base * (Decimal::ONE + multiplier));

        tracing::debug!(
            tickets = tickets.len(),
            %base,
            %multiplier,
            %total,
            "Priced ticket selection"
        );

        PriceBreakdown {
            ticket_count: tickets.len(),
            base,
            surcharges,
            multiplier,
            total,
        }
    }

    /// Price a `(class, count)` composition
    pub fn price_counts(&self, counts: &[(TicketClass, u32)], context: &PricingContext) -> PriceBreakdown {
        let tickets: Vec<TicketClass> = counts
            .iter()
            .flat_map(|(class, count)| std::iter::repeat(*class).take(*count as usize))
            .collect();
        self.price(&tickets, context)
    }

    /// Price ticket classes given as text, e.g. from the command line
    pub fn price_labels(&self, labels: &[&str], context: &PricingContext) -> CoreResult<PriceBreakdown> {
        let tickets = labels
            .iter()
            .map(|label| label.parse::<TicketClass>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.price(&tickets, context))
    }
}
