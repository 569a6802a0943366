use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::reservation::{Guest, Reservation};
use crate::room::Room;

/// Repository trait for reservation persistence.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations; empty vec when none exist.
    async fn list(&self) -> Result<Vec<Reservation>, StoreError>;

    /// `StoreError::NotFound` when no row matches.
    async fn get(&self, id: Uuid) -> Result<Reservation, StoreError>;

    /// Atomic create: assign an id if nil, upsert the guest, verify the
    /// room exists, insert the row. All-or-nothing; any failure rolls the
    /// whole transaction back.
    async fn create(&self, reservation: Reservation) -> Result<Reservation, StoreError>;

    /// True if a row was removed; a miss is not an error.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Reservations with `start > now`, ascending by start.
    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, StoreError>;

    /// True iff any reservation for the room overlaps `[start, end)`.
    async fn has_overlap(
        &self,
        room_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn get_guest(&self, email: &str) -> Result<Option<Guest>, StoreError>;
}

/// Repository trait for room records.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Room>, StoreError>;

    async fn get(&self, number: &str) -> Result<Option<Room>, StoreError>;

    async fn create(&self, room: Room) -> Result<Room, StoreError>;

    /// True if a row was removed; a miss is not an error.
    async fn delete(&self, number: &str) -> Result<bool, StoreError>;
}
