use cinebook_core::{Booking, Catalog};
use cinebook_shared::{Money, MovieId};
use serde::Serialize;
use std::collections::HashMap;

/// Sales figures for one movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieSales {
    pub movie_id: MovieId,
    pub title: String,
    pub tickets_sold: usize,
    pub revenue: Money,
}

/// Aggregate confirmed bookings per movie, best sellers first.
/// Cancelled bookings are ignored.
pub fn sales_by_movie(bookings: &[Booking], catalog: &dyn Catalog) -> Vec<MovieSales> {
    let mut totals: HashMap<&MovieId, (usize, Money)> = HashMap::new();

    for booking in bookings.iter().filter(|b| b.is_active()) {
        let entry = totals.entry(&booking.movie_id).or_default();
        entry.0 += booking.ticket_count();
        entry.1 += booking.total_price;
    }

    let mut report: Vec<MovieSales> = totals
        .into_iter()
        .map(|(movie_id, (tickets_sold, revenue))| MovieSales {
            movie_id: movie_id.clone(),
            title: catalog
                .movie(movie_id)
                .map(|movie| movie.title.clone())
                .unwrap_or_else(|| movie_id.to_string()),
            tickets_sold,
            revenue,
        })
        .collect();

    report.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| b.tickets_sold.cmp(&a.tickets_sold))
            .then_with(|| a.title.cmp(&b.title))
    });
    report
}
