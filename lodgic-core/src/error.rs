use uuid::Uuid;

/// Failures surfaced by the persistence layer. Domain misses are distinct
/// variants so callers can map them to specific responses; everything else
/// is wrapped as `Backend` with the original cause kept for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("reservation {0} not found")]
    NotFound(Uuid),
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("room {0} is already booked for an overlapping date range")]
    Conflict(String),
    #[error("storage failure: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub fn backend(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend {
            source: source.into(),
        }
    }
}

/// Terminal rejection states of a booking request.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid room number {0:?}; expected a 3-digit number with a non-zero units digit")]
    InvalidRoomNumber(String),
    #[error("room {0} is not available for the requested dates")]
    RoomUnavailable(String),
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("storage failure")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RoomNotFound(number) => BookingError::RoomNotFound(number),
            StoreError::Conflict(number) => BookingError::RoomUnavailable(number),
            other => BookingError::Storage(other),
        }
    }
}
