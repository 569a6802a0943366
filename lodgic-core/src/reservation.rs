use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A room booking. The wire form keeps the PascalCase field names the
/// existing UI sends and expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    /// Nil means "server, assign one".
    #[serde(default)]
    pub id: Uuid,
    pub room_number: String,
    pub guest_email: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub checked_out: bool,
}

impl Reservation {
    /// Length of stay in whole days.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Guests are created implicitly the first time an email books; the name
/// defaults to the email and is never updated through this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub email: String,
    pub name: String,
}
