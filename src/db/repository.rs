//! Database repository for players and room snapshots.

use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::models::{
    NewPlayerRow, NewRoomRow, PlayerRow, RoomRow, decode_board, slot_from_db, symbol_to_db,
};
use crate::db::{DbError, schema};
use crate::game::{Player, PlayerId, Room, RoomId, Symbol};

/// Repository over the SQLite database holding player records and room
/// snapshots.
///
/// Snapshots are written by callers after a successful mutating room
/// operation, under the same lock hold that serialized the mutation, so
/// snapshots for a room commit in mutation order.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given
    /// path. Use `":memory:"` for an in-memory database.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating GameRepository");
        Self { db_path }
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Stores a new player record with no symbol assigned.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the id already exists or a database error
    /// occurs.
    #[instrument(skip(self))]
    pub fn create_player(&self, id: PlayerId, name: &str) -> Result<PlayerRow, DbError> {
        debug!(player_id = %id, name = %name, "Creating player");
        let mut conn = self.connection()?;

        let new_player = NewPlayerRow::new(id.to_string(), name.to_string());

        let row = diesel::insert_into(schema::players::table)
            .values(&new_player)
            .returning(PlayerRow::as_returning())
            .get_result(&mut conn)?;

        info!(player_id = %id, name = %name, "Player created");
        Ok(row)
    }

    /// Gets a player record by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player(&self, id: PlayerId) -> Result<Option<PlayerRow>, DbError> {
        debug!(player_id = %id, "Looking up player");
        let mut conn = self.connection()?;

        let row = schema::players::table
            .find(id.to_string())
            .first::<PlayerRow>(&mut conn)
            .optional()?;

        if row.is_none() {
            debug!(player_id = %id, "Player not found");
        }
        Ok(row)
    }

    /// Lists all player records, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_players(&self) -> Result<Vec<PlayerRow>, DbError> {
        debug!("Listing players");
        let mut conn = self.connection()?;

        let rows = schema::players::table
            .order(schema::players::created_at.asc())
            .load::<PlayerRow>(&mut conn)?;

        info!(count = rows.len(), "Players loaded");
        Ok(rows)
    }

    /// Records a player's assigned symbol.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_player_symbol(&self, id: PlayerId, symbol: Symbol) -> Result<(), DbError> {
        debug!(player_id = %id, symbol = %symbol, "Recording player symbol");
        let mut conn = self.connection()?;
        Self::record_symbol(&mut conn, id, symbol)
    }

    fn record_symbol(
        conn: &mut SqliteConnection,
        id: PlayerId,
        symbol: Symbol,
    ) -> Result<(), DbError> {
        diesel::update(schema::players::table.find(id.to_string()))
            .set(schema::players::symbol.eq(symbol_to_db(symbol)))
            .execute(conn)?;
        Ok(())
    }

    /// Upserts a room snapshot, and records the occupants' symbols once
    /// the room is full.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, room), fields(room_id = %room.id()))]
    pub fn save_room(&self, room: &Room) -> Result<(), DbError> {
        debug!("Saving room snapshot");
        let mut conn = self.connection()?;

        let row = NewRoomRow::from_room(room);
        diesel::insert_into(schema::rooms::table)
            .values(&row)
            .on_conflict(schema::rooms::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)?;

        for player in [Some(room.first_player()), room.second_player()]
            .into_iter()
            .flatten()
        {
            if let Some(symbol) = player.assigned_symbol() {
                Self::record_symbol(&mut conn, player.id(), symbol)?;
            }
        }

        info!(room_id = %room.id(), "Room snapshot saved");
        Ok(())
    }

    /// Loads a room from its snapshot, rebuilding its players from the
    /// players table. Returns `None` if no snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on database errors or when the stored snapshot
    /// fails to decode (malformed grid, marker, or ids).
    #[instrument(skip(self))]
    pub fn load_room(&self, id: RoomId) -> Result<Option<Room>, DbError> {
        debug!(room_id = %id, "Loading room snapshot");
        let mut conn = self.connection()?;

        let row = schema::rooms::table
            .find(id.to_string())
            .first::<RoomRow>(&mut conn)
            .optional()?;
        let Some(row) = row else {
            debug!(room_id = %id, "Room snapshot not found");
            return Ok(None);
        };

        let first = self.load_occupant(&mut conn, row.first_player_id())?;
        let second = row
            .second_player_id()
            .as_ref()
            .map(|pid| self.load_occupant(&mut conn, pid))
            .transpose()?;

        let board = decode_board(row.board())?;
        let active = slot_from_db(row.active_slot())?;

        info!(room_id = %id, "Room rebuilt from snapshot");
        Ok(Some(Room::from_parts(id, first, second, board, active)))
    }

    fn load_occupant(&self, conn: &mut SqliteConnection, id: &str) -> Result<Player, DbError> {
        let player_id: PlayerId = id
            .parse()
            .map_err(|e| DbError::new(format!("Invalid stored player id '{}': {}", id, e)))?;
        let row = schema::players::table
            .find(id)
            .first::<PlayerRow>(conn)
            .optional()?
            .ok_or_else(|| DbError::new(format!("Room references missing player '{}'", id)))?;
        Ok(Player::new(player_id, row.name().clone()))
    }
}
