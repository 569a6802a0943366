use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use lodgic_core::error::StoreError;
use lodgic_core::repository::ReservationRepository;
use lodgic_core::reservation::{Guest, Reservation};
use lodgic_core::room::{format_room_number, room_number_to_int};

pub struct SqliteReservationRepository {
    pool: SqlitePool,
}

impl SqliteReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Row shape of the reservations table; room numbers are stored in their
/// integer form and formatted back on the way out.
#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: String,
    room_number: i64,
    guest_email: String,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    checked_in: bool,
    checked_out: bool,
}

impl ReservationRow {
    fn into_domain(self) -> Result<Reservation, StoreError> {
        let id = Uuid::parse_str(&self.id).map_err(StoreError::backend)?;
        Ok(Reservation {
            id,
            room_number: format_room_number(self.room_number),
            guest_email: self.guest_email,
            start: self.start_at,
            end: self.end_at,
            checked_in: self.checked_in,
            checked_out: self.checked_out,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, room_number, guest_email, start_at, end_at, checked_in, checked_out FROM reservations";

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    async fn list(&self) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query_as::<_, ReservationRow>(SELECT_COLUMNS)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        rows.into_iter().map(ReservationRow::into_domain).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Reservation, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.ok_or(StoreError::NotFound(id))?.into_domain()
    }

    async fn create(&self, mut reservation: Reservation) -> Result<Reservation, StoreError> {
        if reservation.id.is_nil() {
            reservation.id = Uuid::new_v4();
        }

        // A number that doesn't parse can't reference any room.
        let room_int = room_number_to_int(&reservation.room_number)
            .ok_or_else(|| StoreError::RoomNotFound(reservation.room_number.clone()))?;

        // Guest upsert, room check, overlap re-check and insert are one
        // atomic unit; dropping the transaction on any early return rolls
        // all of it back. BEGIN IMMEDIATE takes SQLite's write lock up
        // front, so the overlap re-check and the insert are serialized
        // against every other create: of two concurrent overlapping
        // bookings, the loser observes the winner's committed row.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(StoreError::backend)?;

        let guest_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM guests WHERE email = ?")
                .bind(&reservation.guest_email)
                .fetch_one(&mut *tx)
                .await
                .map_err(StoreError::backend)?;

        if guest_exists == 0 {
            sqlx::query("INSERT INTO guests (email, name) VALUES (?, ?)")
                .bind(&reservation.guest_email)
                .bind(&reservation.guest_email)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::backend)?;
        }

        let room_exists: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM rooms WHERE number = ?")
            .bind(room_int)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

        if room_exists == 0 {
            warn!(room = %reservation.room_number, "create aborted: room does not exist");
            return Err(StoreError::RoomNotFound(reservation.room_number));
        }

        // The orchestrator's cache-backed availability check is only a fast
        // path; this query, under the write lock, is authoritative.
        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM reservations WHERE room_number = ? AND start_at < ? AND end_at > ?",
        )
        .bind(room_int)
        .bind(reservation.end)
        .bind(reservation.start)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        if overlapping > 0 {
            warn!(room = %reservation.room_number, "create aborted: overlapping reservation exists");
            return Err(StoreError::Conflict(reservation.room_number));
        }

        sqlx::query(
            "INSERT INTO reservations (id, room_number, guest_email, start_at, end_at, checked_in, checked_out) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(reservation.id.to_string())
        .bind(room_int)
        .bind(&reservation.guest_email)
        .bind(reservation.start)
        .bind(reservation.end)
        .bind(reservation.checked_in)
        .bind(reservation.checked_out)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        tx.commit().await.map_err(StoreError::backend)?;

        info!(reservation = %reservation.id, room = %reservation.room_number, "reservation created");

        // Return the reservation as constructed, not re-read from storage.
        Ok(reservation)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "{SELECT_COLUMNS} WHERE start_at > ? ORDER BY start_at ASC"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter().map(ReservationRow::into_domain).collect()
    }

    async fn has_overlap(
        &self,
        room_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let Some(room_int) = room_number_to_int(room_number) else {
            // No room, no reservations to collide with.
            return Ok(false);
        };

        // Half-open overlap: [s1, e1) and [s2, e2) collide iff s1 < e2 and s2 < e1.
        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM reservations WHERE room_number = ? AND start_at < ? AND end_at > ?",
        )
        .bind(room_int)
        .bind(end)
        .bind(start)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(overlapping > 0)
    }

    async fn get_guest(&self, email: &str) -> Result<Option<Guest>, StoreError> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT email, name FROM guests WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(|(email, name)| Guest { email, name }))
    }
}
