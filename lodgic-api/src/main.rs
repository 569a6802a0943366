use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lodgic_api::{app, AppState};
use lodgic_core::availability::{AvailabilityCache, AvailabilityChecker};
use lodgic_core::booking::BookingService;
use lodgic_core::repository::{ReservationRepository, RoomRepository};
use lodgic_store::{DbClient, SqliteReservationRepository, SqliteRoomRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lodgic_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = lodgic_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Lodgic API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to open database");
    db.migrate().await.expect("Failed to run migrations");

    let reservations: Arc<dyn ReservationRepository> =
        Arc::new(SqliteReservationRepository::new(db.pool.clone()));
    let rooms: Arc<dyn RoomRepository> = Arc::new(SqliteRoomRepository::new(db.pool.clone()));

    let cache = AvailabilityCache::new(Duration::from_secs(config.cache.availability_ttl_seconds));
    let availability = Arc::new(AvailabilityChecker::new(reservations.clone(), cache));
    let booking = Arc::new(BookingService::new(reservations.clone(), availability.clone()));

    let app = app(AppState {
        reservations,
        rooms,
        booking,
        availability,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
