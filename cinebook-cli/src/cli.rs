use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cinebook", version, about = "Movie ticket booking and pricing")]
pub struct Cli {
    /// Directory holding the catalog, settings and booking files
    #[arg(long, global = true, env = "CINEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List movies
    Movies,
    /// List showtimes, optionally for one movie
    Showtimes {
        #[arg(long)]
        movie: Option<String>,
    },
    /// Show the seat map of a showtime
    Seats { showtime: String },
    /// Price tickets for a showtime without choosing seats
    Quote {
        showtime: String,
        /// Ticket classes, e.g. `adult,child,senior`
        #[arg(long, value_delimiter = ',', required = true)]
        tickets: Vec<String>,
    },
    /// Book seats for a showtime
    Book {
        showtime: String,
        #[arg(long)]
        customer: String,
        /// `SEAT[:CLASS]`, e.g. `A1:adult` or `B3:child`. Repeat per seat.
        #[arg(long = "seat", required = true)]
        seats: Vec<String>,
    },
    /// Cancel a booking by id
    Cancel { booking_id: String },
    /// Booking history of a customer, newest first
    History { customer: String },
    /// Ticket sales per movie
    Sales,
    /// Inspect or change pricing settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Change base ticket rates; omitted classes keep their rate
    SetRates(RateArgs),
    /// Change surcharge fractions, e.g. `--premium 0.20`
    SetSurcharges(SurchargeArgs),
    AddHoliday { date: String },
    RemoveHoliday { date: String },
}

#[derive(Debug, Args)]
pub struct RateArgs {
    #[arg(long)]
    pub adult: Option<Decimal>,
    #[arg(long)]
    pub child: Option<Decimal>,
    #[arg(long)]
    pub senior: Option<Decimal>,
}

#[derive(Debug, Args)]
pub struct SurchargeArgs {
    #[arg(long)]
    pub premium: Option<Decimal>,
    #[arg(long)]
    pub blockbuster: Option<Decimal>,
    #[arg(long)]
    pub weekend: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_book_command() {
        let cli = Cli::try_parse_from([
            "cinebook", "book", "S1", "--customer", "alice", "--seat", "A1:adult", "--seat", "A2:child",
        ])
        .unwrap();

        match cli.command {
            Command::Book { showtime, customer, seats } => {
                assert_eq!(showtime, "S1");
                assert_eq!(customer, "alice");
                assert_eq!(seats, vec!["A1:adult", "A2:child"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_book_requires_a_seat() {
        assert!(Cli::try_parse_from(["cinebook", "book", "S1", "--customer", "alice"]).is_err());
    }

    #[test]
    fn test_parse_quote_ticket_list() {
        let cli = Cli::try_parse_from(["cinebook", "quote", "S1", "--tickets", "adult,child"]).unwrap();
        assert!(matches!(cli.command, Command::Quote { ref tickets, .. } if tickets.len() == 2));
    }

    #[test]
    fn test_parse_settings_rates() {
        let cli = Cli::try_parse_from([
            "cinebook", "--data-dir", "/tmp/cb", "settings", "set-rates", "--adult", "12.50",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/cb")));
        match cli.command {
            Command::Settings { action: SettingsCommand::SetRates(rates) } => {
                assert_eq!(rates.adult, Some(Decimal::new(1250, 2)));
                assert!(rates.child.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_decimal_rate() {
        assert!(Cli::try_parse_from(["cinebook", "settings", "set-surcharges", "--weekend", "ten"]).is_err());
    }
}
