//! Error taxonomy for board and room operations.

use derive_more::{Display, Error};

/// A rejected game operation.
///
/// Every variant is a caller-input or precondition violation; none is
/// transient or retriable, and none leaves the room partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
pub enum GameError {
    /// Coordinates outside the 3x3 grid.
    #[display("row and column must be between 1 and 3")]
    OutOfRange,
    /// Target cell already holds a symbol.
    #[display("the chosen cell is already occupied")]
    CellOccupied,
    /// Play attempted by the non-active player.
    #[display("it is not this player's turn")]
    NotYourTurn,
    /// Second-player attachment with the same identity as the first.
    #[display("player is already in the room")]
    DuplicatePlayer,
    /// Attachment attempted when both slots are filled.
    #[display("room already has two players")]
    RoomAlreadyFull,
    /// Operation requiring two players invoked before the second joined.
    #[display("room is still waiting for a second player")]
    RoomIncomplete,
    /// Symbol read before assignment.
    #[display("no symbol has been assigned to this player")]
    SymbolNotAssigned,
}
