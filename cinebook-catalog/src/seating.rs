use cinebook_core::CoreError;
use cinebook_shared::models::seat::MAX_ROWS;
use cinebook_shared::SeatCode;

/// Booked/free state for every seat of one showtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingGrid {
    rows: usize,
    columns: usize,
    booked: Vec<bool>,
}

impl SeatingGrid {
    /// Create an all-free grid; dimensions never change afterwards
    pub fn new(rows: usize, columns: usize) -> Result<Self, SeatingError> {
        if rows == 0 || columns == 0 || rows > MAX_ROWS || SeatCode::from_indexes(0, columns - 1).is_none() {
            return Err(SeatingError::InvalidDimensions { rows, columns });
        }

        Ok(Self {
            rows,
            columns,
            booked: vec![false; rows * columns],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn capacity(&self) -> usize {
        self.booked.len()
    }

    pub fn available_count(&self) -> usize {
        self.booked.iter().filter(|booked| !**booked).count()
    }

    /// Seats currently booked, in row-major order
    pub fn booked_seats(&self) -> Vec<SeatCode> {
        self.booked
            .iter()
            .enumerate()
            .filter(|(_, booked)| **booked)
            .filter_map(|(idx, _)| SeatCode::from_indexes(idx / self.columns, idx % self.columns))
            .collect()
    }

    pub fn is_available(&self, seat: &SeatCode) -> Result<bool, SeatingError> {
        let idx = self.index(seat)?;
        Ok(!self.booked[idx])
    }

    /// Read-only check reporting every booked seat in the selection
    pub fn check_available(&self, seats: &[SeatCode]) -> Result<(), SeatingError> {
        let mut taken = Vec::new();
        for seat in seats {
            if !self.is_available(seat)? && !taken.contains(seat) {
                taken.push(*seat);
            }
        }

        if taken.is_empty() {
            Ok(())
        } else {
            Err(SeatingError::Unavailable(taken))
        }
    }

    /// Book all seats or none of them
    pub fn reserve(&mut self, seats: &[SeatCode]) -> Result<(), SeatingError> {
        let mut indexes = Vec::with_capacity(seats.len());
        for seat in seats {
            let idx = self.index(seat)?;
            if self.booked[idx] {
                return Err(SeatingError::Conflict(*seat));
            }
            indexes.push(idx);
        }

        for idx in indexes {
            self.booked[idx] = true;
        }
        Ok(())
    }

    /// Free the given seats. Releasing a free seat is a no-op.
    pub fn release(&mut self, seats: &[SeatCode]) -> Result<(), SeatingError> {
        let indexes = seats
            .iter()
            .map(|seat| self.index(seat))
            .collect::<Result<Vec<_>, _>>()?;

        for idx in indexes {
            self.booked[idx] = false;
        }
        Ok(())
    }

    /// Text seat map: `O` free, `X` booked
    pub fn render(&self) -> String {
        let width = self.columns * 3;
        let mut out = format!("   {:^width$}\n   {}\n  ", "SCREEN", "-".repeat(width));

        let header: String = (1..=self.columns).map(|column| format!("{:>3}", column)).collect();
        out.push_str(&header);
        out.push('\n');

        for (row, seats) in self.booked.chunks(self.columns).enumerate() {
            out.push((b'A' + row as u8) as char);
            out.push(' ');
            for &booked in seats {
                out.push_str(if booked { "  X" } else { "  O" });
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, seat: &SeatCode) -> Result<usize, SeatingError> {
        let (row, column) = (seat.row_index(), seat.column_index());
        if row >= self.rows || column >= self.columns {
            return Err(SeatingError::OutOfBounds(*seat));
        }
        Ok(row * self.columns + column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatingError {
    #[error("Seat {0} is outside the seating grid")]
    OutOfBounds(SeatCode),

    #[error("Seats already booked: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Unavailable(Vec<SeatCode>),

    #[error("Seat {0} is already booked")]
    Conflict(SeatCode),

    #[error("Invalid grid dimensions {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize },
}

impl From<SeatingError> for CoreError {
    fn from(err: SeatingError) -> Self {
        match err {
            SeatingError::OutOfBounds(seat) => CoreError::not_found("Seat", seat),
            SeatingError::Unavailable(seats) => CoreError::SeatUnavailable(seats),
            SeatingError::Conflict(seat) => CoreError::SeatConflict(seat),
            other => CoreError::ValidationError(other.to_string()),
        }
    }
}
