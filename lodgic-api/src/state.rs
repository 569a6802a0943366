use std::sync::Arc;

use lodgic_core::availability::AvailabilityChecker;
use lodgic_core::booking::BookingService;
use lodgic_core::repository::{ReservationRepository, RoomRepository};

#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<dyn ReservationRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub booking: Arc<BookingService>,
    pub availability: Arc<AvailabilityChecker>,
}
