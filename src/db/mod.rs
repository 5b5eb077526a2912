//! Persistence layer: player records and room snapshots in SQLite.

mod error;
mod models;
mod repository;
mod schema; // Diesel schema - internal use only

pub use error::DbError;
pub use models::{NewPlayerRow, NewRoomRow, PlayerRow, RoomRow};
pub use repository::GameRepository;
