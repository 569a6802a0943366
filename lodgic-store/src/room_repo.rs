use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

use lodgic_core::error::StoreError;
use lodgic_core::repository::RoomRepository;
use lodgic_core::room::{format_room_number, room_number_to_int, Room};

pub struct SqliteRoomRepository {
    pool: SqlitePool,
}

impl SqliteRoomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    number: i64,
    state: i64,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            number: format_room_number(row.number),
            state: row.state,
        }
    }
}

#[async_trait]
impl RoomRepository for SqliteRoomRepository {
    async fn list(&self) -> Result<Vec<Room>, StoreError> {
        let rows =
            sqlx::query_as::<_, RoomRow>("SELECT number, state FROM rooms ORDER BY number ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn get(&self, number: &str) -> Result<Option<Room>, StoreError> {
        let Some(number_int) = room_number_to_int(number) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, RoomRow>("SELECT number, state FROM rooms WHERE number = ?")
            .bind(number_int)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(row.map(Room::from))
    }

    async fn create(&self, room: Room) -> Result<Room, StoreError> {
        let number_int = room_number_to_int(&room.number)
            .ok_or_else(|| StoreError::RoomNotFound(room.number.clone()))?;

        sqlx::query("INSERT INTO rooms (number, state) VALUES (?, ?)")
            .bind(number_int)
            .bind(room.state)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        info!(room = %room.number, "room created");
        Ok(room)
    }

    async fn delete(&self, number: &str) -> Result<bool, StoreError> {
        let Some(number_int) = room_number_to_int(number) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM rooms WHERE number = ?")
            .bind(number_int)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(result.rows_affected() > 0)
    }
}
