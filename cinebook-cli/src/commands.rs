use crate::cli::{Command, RateArgs, SettingsCommand, SurchargeArgs};
use crate::error::AppError;
use crate::state::AppState;
use cinebook_catalog::{PriceBreakdown, SurchargeKind};
use cinebook_core::{Booking, CoreError, CoreResult, SystemSettings, TicketLine};
use cinebook_order::MovieSales;
use cinebook_shared::{BookingId, CinemaClass, MovieId, MovieStatus, ShowtimeId, TicketClass};
use rust_decimal::Decimal;

pub async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    let engine = &state.engine;

    match command {
        Command::Movies => {
            let catalog = engine.catalog();
            for movie in catalog.movies() {
                println!(
                    "{:<8} {:<32} {:<14}{}",
                    movie.id,
                    movie.title,
                    status_label(movie.status),
                    if movie.flags.is_blockbuster { " blockbuster" } else { "" }
                );
            }
        }
        Command::Showtimes { movie } => {
            let catalog = engine.catalog();
            let movie = movie.map(MovieId::new);
            if let Some(id) = &movie {
                catalog.movie(id).ok_or_else(|| CoreError::not_found("Movie", id))?;
            }

            for showtime in catalog
                .showtimes()
                .into_iter()
                .filter(|s| movie.as_ref().map_or(true, |id| &s.movie_id == id))
            {
                let title = catalog
                    .movie(&showtime.movie_id)
                    .map_or(showtime.movie_id.as_str(), |m| m.title.as_str());
                let (cinema, class) = catalog
                    .cinema(&showtime.cinema_id)
                    .map_or((showtime.cinema_id.as_str(), "?"), |c| (c.name.as_str(), class_label(c.class)));
                let free = engine.seat_map(&showtime.id)?.available_count();

                println!(
                    "{:<8} {}  {:<28} {:<20} {:<8} {} free",
                    showtime.id,
                    showtime.starts_at.format("%Y-%m-%d %H:%M"),
                    title,
                    cinema,
                    class,
                    free
                );
            }
        }
        Command::Seats { showtime } => {
            let grid = engine.seat_map(&ShowtimeId::new(showtime))?;
            print!("{}", grid.render());
            println!("{} of {} seats free", grid.available_count(), grid.capacity());
        }
        Command::Quote { showtime, tickets } => {
            let classes = tickets
                .iter()
                .map(|label| label.trim().parse::<TicketClass>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(CoreError::from)?;
            let price = engine.quote(&ShowtimeId::new(showtime), &classes)?;
            print!("{}", format_price(&price));
        }
        Command::Book { showtime, customer, seats } => {
            let lines = seats
                .iter()
                .map(|raw| parse_ticket_line(raw))
                .collect::<CoreResult<Vec<_>>>()?;

            let draft = engine.start_draft(&ShowtimeId::new(showtime), &customer)?;
            let priced = engine.select_seats(&draft, lines)?;
            let booking = engine.commit(priced.clone()).await?;

            print!("{}", format_price(priced.price()));
            println!("Booked {} ({})", booking.transaction_id, booking.id);
        }
        Command::Cancel { booking_id } => {
            let id = booking_id
                .trim()
                .parse::<BookingId>()
                .map_err(|_| CoreError::not_found("Booking", &booking_id))?;
            let booking = engine.cancel(id).await?;
            println!("Cancelled {} ({})", booking.transaction_id, booking.id);
        }
        Command::History { customer } => {
            let bookings = engine.bookings_for_customer(&customer).await?;
            if bookings.is_empty() {
                println!("No bookings for {}", customer.trim());
            }
            for booking in &bookings {
                println!("{}", format_booking(booking));
            }
        }
        Command::Sales => print!("{}", format_sales(&engine.sales_report().await?)),
        Command::Settings { action } => run_settings(state, action).await?,
    }

    Ok(())
}

async fn run_settings(state: &AppState, action: SettingsCommand) -> Result<(), AppError> {
    let settings = state.engine.settings();

    match action {
        SettingsCommand::Show => {}
        SettingsCommand::SetRates(RateArgs { adult, child, senior }) => {
            let mut rates = settings.get().base_rates;
            rates.adult = adult.unwrap_or(rates.adult);
            rates.child = child.unwrap_or(rates.child);
            rates.senior = senior.unwrap_or(rates.senior);
            settings.set_base_rates(rates).await?;
        }
        SettingsCommand::SetSurcharges(SurchargeArgs { premium, blockbuster, weekend }) => {
            let mut surcharges = settings.get().surcharges;
            surcharges.premium_cinema = premium.unwrap_or(surcharges.premium_cinema);
            surcharges.blockbuster = blockbuster.unwrap_or(surcharges.blockbuster);
            surcharges.weekend = weekend.unwrap_or(surcharges.weekend);
            settings.set_surcharges(surcharges).await?;
        }
        SettingsCommand::AddHoliday { date } => {
            settings.add_holiday(&date).await?;
        }
        SettingsCommand::RemoveHoliday { date } => {
            if !settings.remove_holiday(&date).await? {
                println!("{} was not a listed holiday", date.trim());
            }
        }
    }

    print!("{}", format_settings(&settings.get()));
    Ok(())
}

/// Parse `SEAT[:CLASS]`; the class defaults to adult
pub fn parse_ticket_line(raw: &str) -> CoreResult<TicketLine> {
    let (seat, class) = match raw.split_once(':') {
        Some((seat, class)) => (seat, class.trim().parse::<TicketClass>()?),
        None => (raw, TicketClass::Adult),
    };
    Ok(TicketLine::new(seat.trim().parse()?, class))
}

pub fn format_price(price: &PriceBreakdown) -> String {
    let mut out = format!("Tickets:   {}\nBase:      {:.2}\n", price.ticket_count, price.base);
    for surcharge in &price.surcharges {
        let percent = (surcharge.rate * Decimal::ONE_HUNDRED).normalize();
        out.push_str(&format!("  + {:<16} {}%\n", surcharge_label(surcharge.kind), percent));
    }
    out.push_str(&format!("Total:     {:.2}\n", price.total));
    out
}

pub fn format_booking(booking: &Booking) -> String {
    let seats = booking
        .lines
        .iter()
        .map(|line| format!("{}:{}", line.seat, line.ticket_class))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{}  {}  {:<9} {:>8.2}  {}  [{}]",
        booking.transaction_id,
        booking.created_at.format("%Y-%m-%d %H:%M"),
        booking.status,
        booking.total_price,
        booking.id,
        seats
    )
}

pub fn format_sales(report: &[MovieSales]) -> String {
    report
        .iter()
        .map(|row| format!("{:<32} {:>5} tickets {:>10.2}\n", row.title, row.tickets_sold, row.revenue))
        .collect()
}

pub fn format_settings(settings: &SystemSettings) -> String {
    let rates = &settings.base_rates;
    let surcharges = &settings.surcharges;
    let holidays = if settings.holidays.is_empty() {
        "none".to_string()
    } else {
        settings
            .holidays
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Base rates: adult {:.2}, child {:.2}, senior {:.2}\n\
         Surcharges: premium {}, blockbuster {}, weekend/holiday {}\n\
         Holidays:   {}\n",
        rates.adult,
        rates.child,
        rates.senior,
        surcharges.premium_cinema,
        surcharges.blockbuster,
        surcharges.weekend,
        holidays
    )
}

fn status_label(status: MovieStatus) -> &'static str {
    match status {
        MovieStatus::ComingSoon => "coming soon",
        MovieStatus::Preview => "preview",
        MovieStatus::NowShowing => "now showing",
        MovieStatus::EndOfShowing => "ended",
    }
}

fn class_label(class: CinemaClass) -> &'static str {
    match class {
        CinemaClass::Standard => "standard",
        CinemaClass::Premium => "premium",
    }
}

fn surcharge_label(kind: SurchargeKind) -> &'static str {
    match kind {
        SurchargeKind::PremiumCinema => "premium cinema",
        SurchargeKind::Blockbuster => "blockbuster",
        SurchargeKind::WeekendOrHoliday => "weekend/holiday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_catalog::AppliedSurcharge;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_ticket_line() {
        let line = parse_ticket_line("b3:Child").unwrap();
        assert_eq!(line.seat.to_string(), "B3");
        assert_eq!(line.ticket_class, TicketClass::Child);

        let line = parse_ticket_line("A10").unwrap();
        assert_eq!(line.ticket_class, TicketClass::Adult);
        assert_eq!(parse_ticket_line(" C2 : senior ").unwrap().ticket_class, TicketClass::Senior);
    }

    #[test]
    fn test_parse_ticket_line_errors() {
        assert!(matches!(
            parse_ticket_line("A1:student"),
            Err(CoreError::InvalidTicketClass(ref c)) if c == "student"
        ));
        assert!(matches!(
            parse_ticket_line("11:adult"),
            Err(CoreError::NotFound { kind: "Seat", .. })
        ));
    }

    #[test]
    fn test_format_price_lists_surcharges() {
        let price = PriceBreakdown {
            ticket_count: 1,
            base: dec!(10.00),
            surcharges: vec![AppliedSurcharge {
                kind: SurchargeKind::PremiumCinema,
                rate: dec!(0.20),
            }],
            multiplier: dec!(0.20),
            total: dec!(12.00),
        };

        let out = format_price(&price);
        assert!(out.contains("premium cinema"));
        assert!(out.contains("Total:     12.00"));
    }

    #[test]
    fn test_format_settings_without_holidays() {
        let out = format_settings(&SystemSettings::default());
        assert!(out.contains("adult 10.00, child 7.00, senior 6.00"));
        assert!(out.contains("Holidays:   none"));
    }
}
