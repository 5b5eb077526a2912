//! Core tic-tac-toe game logic: board geometry and room state machine.

mod board;
mod error;
mod player;
mod room;

pub use board::{Board, Cell, Symbol};
pub use error::GameError;
pub use player::{Player, PlayerId};
pub use room::{ActiveSlot, Outcome, Room, RoomId};
