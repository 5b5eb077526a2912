//! Tic-tac-toe rooms: a two-player board game served over a REST API.
//!
//! # Architecture
//!
//! - **Game**: the pure core - board geometry, turn order, and outcome
//!   resolution, with an explicit error taxonomy.
//! - **Registry**: the in-memory store of live rooms; one lock hold per
//!   logical operation.
//! - **Db**: SQLite persistence of player records and room snapshots.
//! - **Server**: the axum REST surface that translates game errors into
//!   transport responses.
//!
//! # Example
//!
//! ```
//! use tictactoe_rooms::{Outcome, Player, PlayerId, Room, RoomId};
//!
//! let andrew = PlayerId::new();
//! let ashley = PlayerId::new();
//! let mut room = Room::new(RoomId::new(), Player::new(andrew, "Andrew"));
//! room.add_player(Player::new(ashley, "Ashley"))?;
//!
//! room.make_play(andrew, 1, 1)?;
//! room.make_play(ashley, 2, 2)?;
//! assert_eq!(room.resolve_outcome(), Outcome::Ongoing);
//! # Ok::<(), tictactoe_rooms::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod db;
mod game;
mod registry;
mod server;

// Crate-level exports - game core
pub use game::{ActiveSlot, Board, Cell, GameError, Outcome, Player, PlayerId, Room, RoomId, Symbol};

// Crate-level exports - room registry
pub use registry::RoomRegistry;

// Crate-level exports - persistence
pub use db::{DbError, GameRepository, PlayerRow, RoomRow};

// Crate-level exports - server types
pub use server::{
    ApiError, AppState, CreatePlayerRequest, OutcomeResponse, PlayRequest, PlayerIdRequest,
    PlayerResponse, router,
};
