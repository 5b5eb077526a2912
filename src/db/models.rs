//! Database models and snapshot codecs.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::{DbError, schema};
use crate::game::{ActiveSlot, Board, Cell, Room, Symbol};

/// Player database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct PlayerRow {
    id: String,
    name: String,
    symbol: Option<String>,
    created_at: NaiveDateTime,
}

impl PlayerRow {
    /// Parses the stored symbol column, if one was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored value is not a valid symbol.
    pub fn parse_symbol(&self) -> Result<Option<Symbol>, DbError> {
        self.symbol.as_deref().map(symbol_from_db).transpose()
    }
}

/// Insertable player model for registering new players.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayerRow {
    id: String,
    name: String,
}

/// Room snapshot database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::rooms)]
pub struct RoomRow {
    id: String,
    first_player_id: String,
    second_player_id: Option<String>,
    board: String,
    active_slot: String,
    updated_at: NaiveDateTime,
}

/// Insertable/upsertable room snapshot.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::rooms)]
pub struct NewRoomRow {
    id: String,
    first_player_id: String,
    second_player_id: Option<String>,
    board: String,
    active_slot: String,
    updated_at: NaiveDateTime,
}

impl NewRoomRow {
    /// Snapshots a room's logical contents: the grid and the active
    /// marker, exactly as the room holds them.
    pub fn from_room(room: &Room) -> Self {
        Self {
            id: room.id().to_string(),
            first_player_id: room.first_player().id().to_string(),
            second_player_id: room.second_player().map(|p| p.id().to_string()),
            board: encode_board(room.board()),
            active_slot: slot_to_db(room.active_slot()).to_string(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Converts a symbol to its stored form.
pub fn symbol_to_db(symbol: Symbol) -> &'static str {
    match symbol {
        Symbol::X => "X",
        Symbol::O => "O",
    }
}

/// Parses a symbol from its stored form.
///
/// # Errors
///
/// Returns [`DbError`] for any value other than `X` or `O`.
pub fn symbol_from_db(s: &str) -> Result<Symbol, DbError> {
    match s {
        "X" => Ok(Symbol::X),
        "O" => Ok(Symbol::O),
        _ => Err(DbError::new(format!("Invalid symbol: '{}'", s))),
    }
}

/// Converts the active-player marker to its stored form.
pub fn slot_to_db(slot: ActiveSlot) -> &'static str {
    match slot {
        ActiveSlot::First => "first",
        ActiveSlot::Second => "second",
    }
}

/// Parses the active-player marker from its stored form.
///
/// # Errors
///
/// Returns [`DbError`] for any value other than `first` or `second`.
pub fn slot_from_db(s: &str) -> Result<ActiveSlot, DbError> {
    match s {
        "first" => Ok(ActiveSlot::First),
        "second" => Ok(ActiveSlot::Second),
        _ => Err(DbError::new(format!("Invalid active slot: '{}'", s))),
    }
}

/// Encodes the grid as 9 row-major characters (`X`, `O`, `.`).
pub fn encode_board(board: &Board) -> String {
    board
        .cells()
        .iter()
        .map(|cell| match cell {
            Cell::Empty => '.',
            Cell::Marked(s) => match s {
                Symbol::X => 'X',
                Symbol::O => 'O',
            },
        })
        .collect()
}

/// Decodes a stored grid, rejecting anything that is not exactly nine
/// cell characters.
///
/// # Errors
///
/// Returns [`DbError`] on wrong length or unknown cell characters.
pub fn decode_board(s: &str) -> Result<Board, DbError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 9 {
        return Err(DbError::new(format!(
            "Invalid board snapshot length: {} (expected 9)",
            chars.len()
        )));
    }
    let mut cells = [Cell::Empty; 9];
    for (i, c) in chars.into_iter().enumerate() {
        cells[i] = match c {
            '.' => Cell::Empty,
            'X' => Cell::Marked(Symbol::X),
            'O' => Cell::Marked(Symbol::O),
            _ => return Err(DbError::new(format!("Invalid board cell: '{}'", c))),
        };
    }
    Ok(Board::from_cells(cells))
}
