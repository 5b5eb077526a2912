//! The room state machine: turn order, move validation, outcome resolution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::{Board, Symbol};
use super::error::GameError;
use super::player::{Player, PlayerId};

/// Opaque unique handle for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RoomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Which occupant holds the next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveSlot {
    /// The player the room was created with.
    First,
    /// The player attached via [`Room::add_player`].
    Second,
}

impl ActiveSlot {
    /// The opposite slot.
    pub fn other(self) -> Self {
        match self {
            ActiveSlot::First => ActiveSlot::Second,
            ActiveSlot::Second => ActiveSlot::First,
        }
    }
}

/// Result of [`Room::resolve_outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The game continues.
    Ongoing,
    /// A player completed a winning line.
    WonBy(PlayerId),
    /// The grid is full with no winning line.
    Stalemate,
}

/// One game session: two players, one board, and the active-turn marker.
///
/// The room is the sole mutator of its board. It enforces no terminal
/// lock: once [`Room::resolve_outcome`] reports a non-ongoing result, the
/// caller stops issuing plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    first: Player,
    second: Option<Player>,
    board: Board,
    active: ActiveSlot,
}

impl Room {
    /// Creates a room occupied by a single player, awaiting a second.
    ///
    /// No symbols are assigned yet; assignment happens when the room
    /// fills.
    pub fn new(id: RoomId, first_player: Player) -> Self {
        Self {
            id,
            first: first_player,
            second: None,
            board: Board::new(),
            active: ActiveSlot::First,
        }
    }

    /// Rebuilds a room from a persisted snapshot.
    ///
    /// Symbols are re-derived from slot order (first gets X, second gets
    /// O) when the snapshot shows a full room.
    pub fn from_parts(
        id: RoomId,
        mut first: Player,
        second: Option<Player>,
        board: Board,
        active: ActiveSlot,
    ) -> Self {
        let second = second.map(|mut p| {
            first.assign_symbol(Symbol::X);
            p.assign_symbol(Symbol::O);
            p
        });
        Self {
            id,
            first,
            second,
            board,
            active,
        }
    }

    /// The room's unique id.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// The board owned by this room.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player the room was created with.
    pub fn first_player(&self) -> &Player {
        &self.first
    }

    /// The second occupant, if one has joined.
    pub fn second_player(&self) -> Option<&Player> {
        self.second.as_ref()
    }

    /// Which slot holds the next turn.
    pub fn active_slot(&self) -> ActiveSlot {
        self.active
    }

    /// The player permitted to make the next play.
    ///
    /// # Errors
    ///
    /// [`GameError::RoomIncomplete`] if the marker points at an empty
    /// second slot (unreachable under normal play; the marker only flips
    /// after a successful play, which requires a full room).
    pub fn active_player(&self) -> Result<&Player, GameError> {
        match self.active {
            ActiveSlot::First => Ok(&self.first),
            ActiveSlot::Second => self.second.as_ref().ok_or(GameError::RoomIncomplete),
        }
    }

    /// Attaches `candidate` as the second player and assigns symbols:
    /// X to the first occupant, O to the second, atomically.
    ///
    /// # Errors
    ///
    /// [`GameError::DuplicatePlayer`] if `candidate` has the first
    /// player's id, [`GameError::RoomAlreadyFull`] if both slots are
    /// taken. Neither assignment happens on failure.
    pub fn add_player(&mut self, mut candidate: Player) -> Result<(), GameError> {
        if candidate.id() == self.first.id() {
            return Err(GameError::DuplicatePlayer);
        }
        if self.second.is_some() {
            return Err(GameError::RoomAlreadyFull);
        }
        self.first.assign_symbol(Symbol::X);
        candidate.assign_symbol(Symbol::O);
        self.second = Some(candidate);
        Ok(())
    }

    /// Verifies both player slots are occupied.
    ///
    /// # Errors
    ///
    /// [`GameError::RoomIncomplete`] while the second slot is empty.
    pub fn require_full(&self) -> Result<(), GameError> {
        match self.second {
            Some(_) => Ok(()),
            None => Err(GameError::RoomIncomplete),
        }
    }

    /// Both players, first then second.
    ///
    /// # Errors
    ///
    /// [`GameError::RoomIncomplete`] while the second slot is empty.
    pub fn players(&self) -> Result<[&Player; 2], GameError> {
        match &self.second {
            Some(second) => Ok([&self.first, second]),
            None => Err(GameError::RoomIncomplete),
        }
    }

    /// Plays the active player's symbol at 1-based `(row, col)`.
    ///
    /// The turn check runs before any board validation: a wrong-turn
    /// attempt never mutates the board, whatever its coordinates. The
    /// active marker flips exactly once per successful play and never on
    /// failure.
    ///
    /// # Errors
    ///
    /// [`GameError::NotYourTurn`] when `player` is not the active
    /// player's id, [`GameError::SymbolNotAssigned`] when the room never
    /// filled, and [`GameError::OutOfRange`] / [`GameError::CellOccupied`]
    /// propagated unchanged from the board.
    pub fn make_play(&mut self, player: PlayerId, row: u8, col: u8) -> Result<(), GameError> {
        let active = self.active_player()?;
        if player != active.id() {
            return Err(GameError::NotYourTurn);
        }
        let symbol = active.symbol()?;
        self.board.place(row, col, symbol)?;
        self.active = self.active.other();
        Ok(())
    }

    /// Computes the game outcome: first player's victory, then the
    /// second's, then stalemate, in that fixed order.
    ///
    /// The order makes the result deterministic even if alternation was
    /// ever violated, and reports a simultaneously full and winning board
    /// as a win. Pure and idempotent; never mutates the room.
    pub fn resolve_outcome(&self) -> Outcome {
        if let Some(symbol) = self.first.assigned_symbol()
            && self.board.evaluate_victory(symbol)
        {
            return Outcome::WonBy(self.first.id());
        }
        if let Some(second) = &self.second
            && let Some(symbol) = second.assigned_symbol()
            && self.board.evaluate_victory(symbol)
        {
            return Outcome::WonBy(second.id());
        }
        if self.board.evaluate_stalemate() {
            return Outcome::Stalemate;
        }
        Outcome::Ongoing
    }
}
