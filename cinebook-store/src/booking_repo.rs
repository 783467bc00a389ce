use crate::flat_file::{append_line, read_optional, write_atomic};
use crate::records::BookingRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cinebook_core::{Booking, BookingStatus, BookingStore, CoreError, CoreResult};
use cinebook_shared::BookingId;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Booking store kept in process memory
#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn save(&self, booking: &Booking) -> CoreResult<BookingId> {
        let mut bookings = self.bookings.write().unwrap_or_else(PoisonError::into_inner);
        ensure_new(&bookings, booking.id)?;
        bookings.push(booking.clone());
        Ok(booking.id)
    }

    async fn find_by_id(&self, id: BookingId) -> CoreResult<Option<Booking>> {
        let bookings = self.bookings.read().unwrap_or_else(PoisonError::into_inner);
        Ok(bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_by_customer(&self, customer_ref: &str) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().unwrap_or_else(PoisonError::into_inner);
        Ok(for_customer(&bookings, customer_ref))
    }

    async fn list_all(&self) -> CoreResult<Vec<Booking>> {
        Ok(self.bookings.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let mut bookings = self.bookings.write().unwrap_or_else(PoisonError::into_inner);
        apply_status(&mut bookings, id, status, at)
    }
}

/// Bookings as JSON Lines, one record per line.
///
/// New bookings are appended; a status change rewrites the whole file
/// atomically. The full set is cached in memory after `open`.
pub struct FileBookingStore {
    path: PathBuf,
    cache: tokio::sync::Mutex<Vec<Booking>>,
}

impl FileBookingStore {
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let bookings = match read_optional(&path).await? {
            Some(contents) => recover(&path, &contents).await?,
            None => Vec::new(),
        };
        info!(path = %path.display(), count = bookings.len(), "Loaded bookings");

        Ok(Self {
            path,
            cache: tokio::sync::Mutex::new(bookings),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BookingStore for FileBookingStore {
    async fn save(&self, booking: &Booking) -> CoreResult<BookingId> {
        let mut cache = self.cache.lock().await;
        ensure_new(&cache, booking.id)?;

        append_line(&self.path, &encode(booking)?).await?;
        cache.push(booking.clone());
        debug!(booking_id = %booking.id, "Booking appended");
        Ok(booking.id)
    }

    async fn find_by_id(&self, id: BookingId) -> CoreResult<Option<Booking>> {
        let cache = self.cache.lock().await;
        Ok(cache.iter().find(|b| b.id == id).cloned())
    }

    async fn list_by_customer(&self, customer_ref: &str) -> CoreResult<Vec<Booking>> {
        let cache = self.cache.lock().await;
        Ok(for_customer(&cache, customer_ref))
    }

    async fn list_all(&self) -> CoreResult<Vec<Booking>> {
        Ok(self.cache.lock().await.clone())
    }

    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let mut cache = self.cache.lock().await;

        let mut next = cache.clone();
        apply_status(&mut next, id, status, at)?;

        write_atomic(&self.path, encode_all(&next)?.as_bytes()).await?;

        *cache = next;
        Ok(())
    }
}

fn ensure_new(bookings: &[Booking], id: BookingId) -> CoreResult<()> {
    if bookings.iter().any(|b| b.id == id) {
        return Err(CoreError::ValidationError(format!("Booking {} already exists", id)));
    }
    Ok(())
}

fn for_customer(bookings: &[Booking], customer_ref: &str) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| b.customer_ref == customer_ref)
        .cloned()
        .collect()
}

fn apply_status(
    bookings: &mut [Booking],
    id: BookingId,
    status: BookingStatus,
    at: DateTime<Utc>,
) -> CoreResult<()> {
    let booking = bookings
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| CoreError::not_found("Booking", id))?;

    booking.status = status;
    booking.cancelled_at = match status {
        BookingStatus::Cancelled => Some(at),
        BookingStatus::Confirmed => None,
    };
    Ok(())
}

fn encode(booking: &Booking) -> CoreResult<String> {
    serde_json::to_string(&BookingRecord::from(booking)).map_err(CoreError::storage)
}

fn encode_all(bookings: &[Booking]) -> CoreResult<String> {
    let mut contents = String::new();
    for booking in bookings {
        contents.push_str(&encode(booking)?);
        contents.push('\n');
    }
    Ok(contents)
}

fn decode(line: &str) -> Result<Booking, String> {
    let record: BookingRecord = serde_json::from_str(line).map_err(|e| e.to_string())?;
    Booking::try_from(record).map_err(|e| e.to_string())
}

/// Decode every complete line. A final line without its newline is what an
/// interrupted append leaves behind: it is kept when it decodes, dropped
/// otherwise, and the file is rewritten so the next append starts clean.
async fn recover(path: &Path, contents: &str) -> CoreResult<Vec<Booking>> {
    let cut = contents.rfind('\n').map_or(0, |idx| idx + 1);
    let (complete, tail) = contents.split_at(cut);

    let mut bookings = decode_lines(path, complete)?;
    if tail.is_empty() {
        return Ok(bookings);
    }

    match decode(tail) {
        Ok(booking) => bookings.push(booking),
        Err(err) => warn!(
            path = %path.display(),
            bytes = tail.len(),
            "Dropping incomplete trailing booking record: {}",
            err
        ),
    }
    write_atomic(path, encode_all(&bookings)?.as_bytes()).await?;
    Ok(bookings)
}

fn decode_lines(path: &Path, contents: &str) -> CoreResult<Vec<Booking>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            decode(line).map_err(|e| {
                CoreError::StorageError(format!("{}:{}: {}", path.display(), idx + 1, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_core::{TicketLine, TransactionId};
    use cinebook_shared::{CinemaId, MovieId, ShowtimeId, TicketClass};
    use rust_decimal_macros::dec;

    fn booking(customer: &str) -> Booking {
        Booking {
            id: BookingId::new(),
            transaction_id: TransactionId::parse("GVP202403151930").unwrap(),
            customer_ref: customer.to_string(),
            showtime_id: ShowtimeId::new("S1"),
            movie_id: MovieId::new("M1"),
            cinema_id: CinemaId::new("C1"),
            lines: vec![
                TicketLine::new("A1".parse().unwrap(), TicketClass::Adult),
                TicketLine::new("A2".parse().unwrap(), TicketClass::Child),
            ],
            total_price: dec!(20.40),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_queries() {
        let store = InMemoryBookingStore::new();
        let first = booking("alice");
        let second = booking("bob");

        assert_eq!(store.save(&first).await.unwrap(), first.id);
        store.save(&second).await.unwrap();
        assert!(store.save(&first).await.is_err());

        assert_eq!(store.find_by_id(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(store.list_by_customer("bob").await.unwrap(), vec![second]);
        assert!(store.list_by_customer("carol").await.unwrap().is_empty());
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_unknown_booking() {
        let store = InMemoryBookingStore::new();
        let err = store
            .update_status(BookingId::new(), BookingStatus::Cancelled, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "Booking", .. }));
    }

    #[tokio::test]
    async fn test_file_store_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.jsonl");

        let store = FileBookingStore::open(&path).await.unwrap();
        let kept = booking("alice");
        let cancelled = booking("alice");
        store.save(&kept).await.unwrap();
        store.save(&cancelled).await.unwrap();

        let at = Utc::now();
        store
            .update_status(cancelled.id, BookingStatus::Cancelled, at)
            .await
            .unwrap();

        let reopened = FileBookingStore::open(&path).await.unwrap();
        let restored = reopened.find_by_id(kept.id).await.unwrap().unwrap();
        assert_eq!(restored.lines, kept.lines);
        assert_eq!(restored.total_price, kept.total_price);
        assert_eq!(restored.transaction_id, kept.transaction_id);

        let restored = reopened.find_by_id(cancelled.id).await.unwrap().unwrap();
        assert_eq!(restored.status, BookingStatus::Cancelled);
        assert_eq!(restored.cancelled_at, Some(at));
        assert_eq!(reopened.list_by_customer("alice").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_file_store_reports_corrupt_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.jsonl");
        std::fs::write(&path, "{\"id\": 1}\n").unwrap();

        let err = FileBookingStore::open(&path).await.err().unwrap();
        assert!(matches!(err, CoreError::StorageError(ref msg) if msg.contains(":1:")));
    }

    #[tokio::test]
    async fn test_file_store_drops_torn_trailing_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.jsonl");

        let store = FileBookingStore::open(&path).await.unwrap();
        let kept = booking("alice");
        store.save(&kept).await.unwrap();
        drop(store);

        // An append cut short mid-record
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{\"id\":\"0b6f");
        std::fs::write(&path, &contents).unwrap();

        let ids = |bookings: Vec<Booking>| bookings.iter().map(|b| b.id).collect::<Vec<_>>();
        let reopened = FileBookingStore::open(&path).await.unwrap();
        assert_eq!(ids(reopened.list_all().await.unwrap()), vec![kept.id]);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));

        let next = booking("bob");
        reopened.save(&next).await.unwrap();
        let reopened = FileBookingStore::open(&path).await.unwrap();
        assert_eq!(ids(reopened.list_all().await.unwrap()), vec![kept.id, next.id]);
    }

    #[tokio::test]
    async fn test_file_store_keeps_complete_record_missing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.jsonl");
        let kept = booking("alice");
        std::fs::write(&path, encode(&kept).unwrap()).unwrap();

        let store = FileBookingStore::open(&path).await.unwrap();
        let restored = store.find_by_id(kept.id).await.unwrap().unwrap();
        assert_eq!(restored.lines, kept.lines);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
    }
}

