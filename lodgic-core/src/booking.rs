use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::availability::AvailabilityChecker;
use crate::error::BookingError;
use crate::repository::ReservationRepository;
use crate::reservation::Reservation;
use crate::room::is_valid_room_number;
use crate::validate::validate_reservation;

/// Runs a single booking request to a terminal state: a committed
/// reservation or a typed rejection. One attempt per caller request, no
/// automatic retries.
pub struct BookingService {
    reservations: Arc<dyn ReservationRepository>,
    availability: Arc<AvailabilityChecker>,
}

impl BookingService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        availability: Arc<AvailabilityChecker>,
    ) -> Self {
        Self {
            reservations,
            availability,
        }
    }

    pub async fn book(&self, mut request: Reservation) -> Result<Reservation, BookingError> {
        validate_reservation(&request)?;

        if !is_valid_room_number(&request.room_number) {
            warn!(room = %request.room_number, "booking rejected: bad room number format");
            return Err(BookingError::InvalidRoomNumber(request.room_number));
        }

        let available = self
            .availability
            .is_available(&request.room_number, request.start, request.end)
            .await?;
        if !available {
            warn!(room = %request.room_number, "booking rejected: dates unavailable");
            return Err(BookingError::RoomUnavailable(request.room_number));
        }

        if request.id.is_nil() {
            request.id = Uuid::new_v4();
        }

        let created = self.reservations.create(request).await?;

        // The exact range just became occupied; drop the cached answer so an
        // identical follow-up request re-checks the store.
        self.availability
            .invalidate(&created.room_number, created.start, created.end);

        info!(reservation = %created.id, room = %created.room_number, "booking committed");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::availability::AvailabilityCache;
    use crate::error::StoreError;
    use crate::reservation::Guest;
    use crate::room::room_number_to_int;

    /// In-memory stand-in for the SQLite repository, with the same create
    /// semantics: guest upsert, room existence check, insert.
    struct InMemoryRepo {
        rooms: Vec<i64>,
        reservations: Mutex<Vec<Reservation>>,
        guests: Mutex<HashMap<String, Guest>>,
    }

    impl InMemoryRepo {
        fn with_rooms(rooms: &[&str]) -> Self {
            Self {
                rooms: rooms
                    .iter()
                    .map(|r| room_number_to_int(r).expect("valid room"))
                    .collect(),
                reservations: Mutex::new(Vec::new()),
                guests: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl ReservationRepository for InMemoryRepo {
        async fn list(&self) -> Result<Vec<Reservation>, StoreError> {
            Ok(self.reservations.lock().unwrap().clone())
        }
        async fn get(&self, id: Uuid) -> Result<Reservation, StoreError> {
            self.reservations
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or(StoreError::NotFound(id))
        }
        async fn create(&self, mut reservation: Reservation) -> Result<Reservation, StoreError> {
            if reservation.id.is_nil() {
                reservation.id = Uuid::new_v4();
            }
            let room = room_number_to_int(&reservation.room_number)
                .ok_or_else(|| StoreError::RoomNotFound(reservation.room_number.clone()))?;
            if !self.rooms.contains(&room) {
                return Err(StoreError::RoomNotFound(reservation.room_number.clone()));
            }
            {
                // Same authoritative guard the SQLite repository runs
                // inside its transaction.
                let existing = self.reservations.lock().unwrap();
                if existing.iter().any(|r| {
                    r.room_number == reservation.room_number
                        && r.start < reservation.end
                        && reservation.start < r.end
                }) {
                    return Err(StoreError::Conflict(reservation.room_number.clone()));
                }
            }
            self.guests
                .lock()
                .unwrap()
                .entry(reservation.guest_email.clone())
                .or_insert_with(|| Guest {
                    email: reservation.guest_email.clone(),
                    name: reservation.guest_email.clone(),
                });
            self.reservations.lock().unwrap().push(reservation.clone());
            Ok(reservation)
        }
        async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
            let mut reservations = self.reservations.lock().unwrap();
            let before = reservations.len();
            reservations.retain(|r| r.id != id);
            Ok(reservations.len() < before)
        }
        async fn list_upcoming(
            &self,
            now: DateTime<Utc>,
        ) -> Result<Vec<Reservation>, StoreError> {
            let mut upcoming: Vec<_> = self
                .reservations
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.start > now)
                .cloned()
                .collect();
            upcoming.sort_by_key(|r| r.start);
            Ok(upcoming)
        }
        async fn has_overlap(
            &self,
            room_number: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            Ok(self
                .reservations
                .lock()
                .unwrap()
                .iter()
                .any(|r| r.room_number == room_number && r.start < end && start < r.end))
        }
        async fn get_guest(&self, email: &str) -> Result<Option<Guest>, StoreError> {
            Ok(self.guests.lock().unwrap().get(email).cloned())
        }
    }

    fn service(rooms: &[&str]) -> BookingService {
        let repo = Arc::new(InMemoryRepo::with_rooms(rooms));
        let checker = Arc::new(AvailabilityChecker::new(
            repo.clone(),
            AvailabilityCache::new(Duration::from_secs(60)),
        ));
        BookingService::new(repo, checker)
    }

    fn request(room: &str, start_day: u32, end_day: u32) -> Reservation {
        Reservation {
            id: Uuid::nil(),
            room_number: room.to_string(),
            guest_email: "guest@example.com".to_string(),
            start: Utc.with_ymd_and_hms(2025, 1, start_day, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 1, end_day, 0, 0, 0).unwrap(),
            checked_in: false,
            checked_out: false,
        }
    }

    #[tokio::test]
    async fn assigns_an_id_when_caller_sends_nil() {
        let service = service(&["101"]);
        let booked = service.book(request("101", 1, 3)).await.unwrap();
        assert!(!booked.id.is_nil());
    }

    #[tokio::test]
    async fn keeps_a_caller_supplied_id() {
        let service = service(&["101"]);
        let mut req = request("101", 1, 3);
        req.id = Uuid::new_v4();
        let expected = req.id;
        let booked = service.book(req).await.unwrap();
        assert_eq!(booked.id, expected);
    }

    #[tokio::test]
    async fn rejects_malformed_requests_before_touching_the_store() {
        let service = service(&["101"]);

        let mut bad_dates = request("101", 5, 5);
        bad_dates.end = bad_dates.start;
        assert!(matches!(
            service.book(bad_dates).await,
            Err(BookingError::Validation(_))
        ));

        assert!(matches!(
            service.book(request("9999", 1, 3)).await,
            Err(BookingError::InvalidRoomNumber(_))
        ));
    }

    #[tokio::test]
    async fn overlapping_booking_is_rejected_adjacent_is_not() {
        let service = service(&["101"]);

        // [Jan 1, Jan 5) committed first.
        service.book(request("101", 1, 5)).await.unwrap();

        // [Jan 3, Jan 7) overlaps and must be rejected.
        assert!(matches!(
            service.book(request("101", 3, 7)).await,
            Err(BookingError::RoomUnavailable(_))
        ));

        // [Jan 5, Jan 8) starts the day the first one ends: no overlap
        // under half-open intervals.
        assert!(service.book(request("101", 5, 8)).await.is_ok());
    }

    #[tokio::test]
    async fn identical_rebooking_is_rejected_despite_a_warm_cache() {
        let service = service(&["101"]);

        // The first booking populates the cache with "available" for this
        // exact range, then invalidates it on commit.
        service.book(request("101", 1, 5)).await.unwrap();
        assert!(matches!(
            service.book(request("101", 1, 5)).await,
            Err(BookingError::RoomUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn other_rooms_are_unaffected_by_a_booking() {
        let service = service(&["101", "102"]);
        service.book(request("101", 1, 5)).await.unwrap();
        assert!(service.book(request("102", 1, 5)).await.is_ok());
    }

    #[tokio::test]
    async fn stale_availability_check_cannot_double_book() {
        // Two requests that both passed the availability check before
        // either committed: the create-level guard must reject the second.
        let repo = InMemoryRepo::with_rooms(&["101"]);
        repo.create(request("101", 1, 5)).await.unwrap();
        let err = repo.create(request("101", 3, 7)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(n) if n == "101"));
    }

    #[tokio::test]
    async fn concurrent_overlapping_bookings_commit_only_one() {
        let service = service(&["101"]);

        let (a, b) = tokio::join!(
            service.book(request("101", 1, 5)),
            service.book(request("101", 3, 7)),
        );

        assert_eq!(
            [&a, &b].iter().filter(|r| r.is_ok()).count(),
            1,
            "exactly one of two overlapping bookings may commit"
        );
        let rejected = if a.is_ok() { b } else { a };
        assert!(matches!(rejected, Err(BookingError::RoomUnavailable(_))));
    }

    #[tokio::test]
    async fn missing_room_maps_to_room_not_found() {
        let service = service(&["101"]);
        assert!(matches!(
            service.book(request("999", 1, 3)).await,
            Err(BookingError::RoomNotFound(n)) if n == "999"
        ));
    }
}
