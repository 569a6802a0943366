pub mod availability;
pub mod booking;
pub mod error;
pub mod repository;
pub mod reservation;
pub mod room;
pub mod validate;

pub use error::{BookingError, StoreError};
pub use reservation::{Guest, Reservation};
pub use room::Room;
