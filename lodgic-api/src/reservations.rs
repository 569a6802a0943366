use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use lodgic_core::reservation::Reservation;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservation", get(list_reservations).post(book_reservation))
        .route("/reservation/upcoming", get(upcoming_reservations))
        .route(
            "/reservation/{id}",
            get(get_reservation).delete(delete_reservation),
        )
}

async fn list_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = state.reservations.list().await?;
    info!(count = reservations.len(), "fetched reservations");
    Ok(Json(reservations))
}

async fn upcoming_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = state.reservations.list_upcoming(Utc::now()).await?;
    Ok(Json(reservations))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state.reservations.get(id).await?;
    Ok(Json(reservation))
}

/// Create a new reservation. Send the nil UUID (all zeros) or omit `Id`
/// to have the server assign one.
async fn book_reservation(
    State(state): State<AppState>,
    Json(request): Json<Reservation>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.booking.book(request).await?;
    info!(reservation = %created.id, "reservation booked");

    let location = format!("/reservation/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.reservations.delete(id).await? {
        info!(reservation = %id, "reservation deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
