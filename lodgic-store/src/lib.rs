pub mod app_config;
pub mod database;
pub mod reservation_repo;
pub mod room_repo;

pub use database::DbClient;
pub use reservation_repo::SqliteReservationRepository;
pub use room_repo::SqliteRoomRepository;
