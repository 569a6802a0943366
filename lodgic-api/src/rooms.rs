use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;

use lodgic_core::room::{is_valid_room_number, Room};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/room", get(list_rooms).post(create_room))
        .route("/room/checkRoomAvailability", get(check_room_availability))
        .route("/room/{number}", get(get_room).delete(delete_room))
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = state.rooms.list().await?;
    Ok(Json(rooms))
}

async fn get_room(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<Room>, AppError> {
    if !is_valid_room_number(&number) {
        return Err(AppError::BadRequest(
            "invalid room number; format is ###, ex 001 / 002 / 101".to_string(),
        ));
    }

    match state.rooms.get(&number).await? {
        Some(room) => Ok(Json(room)),
        None => Err(AppError::NotFound),
    }
}

async fn create_room(
    State(state): State<AppState>,
    Json(room): Json<Room>,
) -> Result<Json<Room>, AppError> {
    if !is_valid_room_number(&room.number) {
        return Err(AppError::BadRequest(
            "invalid room number; format is ###, ex 001 / 002 / 101".to_string(),
        ));
    }

    let created = state.rooms.create(room).await?;
    Ok(Json(created))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<StatusCode, AppError> {
    if !is_valid_room_number(&number) {
        return Err(AppError::BadRequest(
            "invalid room number; format is ###, ex 001 / 002 / 101".to_string(),
        ));
    }

    if state.rooms.delete(&number).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityQuery {
    room_number: String,
    start_date: String,
    end_date: String,
}

/// Availability answers are cached per (room, start, end) key with a
/// 15-minute TTL inside the checker.
async fn check_room_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !is_valid_room_number(&query.room_number) {
        return Err(AppError::BadRequest(
            "invalid room number; format is ###, ex 001 / 002 / 101".to_string(),
        ));
    }

    let start = parse_date(&query.start_date)?;
    let end = parse_date(&query.end_date)?;

    let available = state
        .availability
        .is_available(&query.room_number, start, end)
        .await?;

    Ok(Json(json!({ "available": available })))
}

/// The UI sends either full RFC 3339 timestamps or bare dates.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }

    raw.parse::<NaiveDate>()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| AppError::BadRequest(format!("unparseable date {raw:?}")))
}
