use crate::seating::SeatingGrid;
use cinebook_core::{Catalog, CoreError, CoreResult};
use cinebook_shared::{Cinema, CinemaId, Movie, MovieId, Showtime, ShowtimeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw catalog content, as read from a seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    pub cinemas: Vec<Cinema>,
    pub movies: Vec<Movie>,
    pub showtimes: Vec<Showtime>,
}

/// Catalog held fully in memory; validated once at construction
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    cinemas: HashMap<CinemaId, Cinema>,
    movies: HashMap<MovieId, Movie>,
    showtimes: HashMap<ShowtimeId, Showtime>,
}

impl InMemoryCatalog {
    pub fn new(data: CatalogData) -> CoreResult<Self> {
        let mut catalog = Self::default();

        for cinema in data.cinemas {
            Cinema::validate_code(&cinema.code)?;
            if catalog.cinemas.insert(cinema.id.clone(), cinema).is_some() {
                return Err(CoreError::ValidationError("Duplicate cinema id".to_string()));
            }
        }

        for movie in data.movies {
            let id = movie.id.clone();
            if catalog.movies.insert(id.clone(), movie).is_some() {
                return Err(CoreError::ValidationError(format!("Duplicate movie id: {}", id)));
            }
        }

        for showtime in data.showtimes {
            catalog.validate_showtime(&showtime)?;
            let id = showtime.id.clone();
            if catalog.showtimes.insert(id.clone(), showtime).is_some() {
                return Err(CoreError::ValidationError(format!("Duplicate showtime id: {}", id)));
            }
        }

        Ok(catalog)
    }

    fn validate_showtime(&self, showtime: &Showtime) -> CoreResult<()> {
        if !self.movies.contains_key(&showtime.movie_id) {
            return Err(CoreError::not_found("Movie", &showtime.movie_id));
        }
        if !self.cinemas.contains_key(&showtime.cinema_id) {
            return Err(CoreError::not_found("Cinema", &showtime.cinema_id));
        }
        SeatingGrid::new(showtime.rows, showtime.columns)?;
        Ok(())
    }

    /// Showtimes screening a given movie, earliest first
    pub fn showtimes_for_movie(&self, movie_id: &MovieId) -> Vec<&Showtime> {
        self.showtimes()
            .into_iter()
            .filter(|showtime| &showtime.movie_id == movie_id)
            .collect()
    }
}

impl Catalog for InMemoryCatalog {
    fn showtime(&self, id: &ShowtimeId) -> Option<&Showtime> {
        self.showtimes.get(id)
    }

    fn showtimes(&self) -> Vec<&Showtime> {
        let mut all: Vec<&Showtime> = self.showtimes.values().collect();
        all.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    fn movie(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.get(id)
    }

    fn movies(&self) -> Vec<&Movie> {
        let mut all: Vec<&Movie> = self.movies.values().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        all
    }

    fn cinema(&self, id: &CinemaId) -> Option<&Cinema> {
        self.cinemas.get(id)
    }
}
