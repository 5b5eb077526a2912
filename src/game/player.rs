//! Player identity and symbol assignment.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::Symbol;
use super::error::GameError;

/// Opaque unique handle for a player.
///
/// Equality is identifier equality, so the contract holds across
/// serialization boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
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

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A participant in a room: an id, a display name, and a symbol that is
/// assigned exactly once when the player's room becomes full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    symbol: Option<Symbol>,
}

impl Player {
    /// Creates a player with no symbol assigned.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: None,
        }
    }

    /// The player's unique id.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// The player's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The assigned symbol.
    ///
    /// # Errors
    ///
    /// [`GameError::SymbolNotAssigned`] if the player's room never filled;
    /// there is no silent default.
    pub fn symbol(&self) -> Result<Symbol, GameError> {
        self.symbol.ok_or(GameError::SymbolNotAssigned)
    }

    /// The assigned symbol if any.
    pub fn assigned_symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    pub(super) fn assign_symbol(&mut self, symbol: Symbol) {
        self.symbol = Some(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_read_before_assignment_is_an_error() {
        let player = Player::new(PlayerId::new(), "Andrew");
        assert_eq!(player.symbol(), Err(GameError::SymbolNotAssigned));
        assert_eq!(player.assigned_symbol(), None);
    }

    #[test]
    fn equality_is_by_identifier() {
        let id = PlayerId::new();
        let a = Player::new(id, "Andrew");
        let b = Player::new(id, "Andrew");
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), PlayerId::new());
    }

    #[test]
    fn player_id_round_trips_through_display() {
        let id = PlayerId::new();
        let parsed: PlayerId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
