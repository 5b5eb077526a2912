//! In-memory registry of live rooms.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};

use crate::game::{Room, RoomId};

/// Cloneable handle to the live rooms of one server process.
///
/// All mutating room operations run as closures while the map lock is
/// held, so the read-modify-write of board and turn state for a room,
/// and any snapshot write the closure performs, are serialized per
/// logical operation.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating room registry");
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Inserts a room, replacing any previous entry with the same id.
    #[instrument(skip(self, room), fields(room_id = %room.id()))]
    pub fn insert(&self, room: Room) {
        let mut rooms = self.rooms.lock().unwrap();
        debug!("Room inserted");
        rooms.insert(room.id(), room);
    }

    /// Inserts a room only when no entry with its id is live yet, in one
    /// lock hold. A rehydrated snapshot therefore never replaces a live
    /// room that may have been mutated since the snapshot was read.
    #[instrument(skip(self, room), fields(room_id = %room.id()))]
    pub fn insert_if_absent(&self, room: Room) {
        let mut rooms = self.rooms.lock().unwrap();
        rooms.entry(room.id()).or_insert_with(|| {
            debug!("Room inserted");
            room
        });
    }

    /// Whether a room with this id is live.
    #[instrument(skip(self))]
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.lock().unwrap().contains_key(&id)
    }

    /// Runs `f` against the room under the lock. Returns `None` when no
    /// room with this id exists.
    #[instrument(skip(self, f))]
    pub fn with_room<T>(&self, id: RoomId, f: impl FnOnce(&Room) -> T) -> Option<T> {
        let rooms = self.rooms.lock().unwrap();
        match rooms.get(&id) {
            Some(room) => Some(f(room)),
            None => {
                debug!(room_id = %id, "Room not found");
                None
            }
        }
    }

    /// Runs `f` against the room mutably under the lock, so one lock hold
    /// spans the whole logical operation. Returns `None` when no room with
    /// this id exists.
    #[instrument(skip(self, f))]
    pub fn with_room_mut<T>(&self, id: RoomId, f: impl FnOnce(&mut Room) -> T) -> Option<T> {
        let mut rooms = self.rooms.lock().unwrap();
        match rooms.get_mut(&id) {
            Some(room) => Some(f(room)),
            None => {
                debug!(room_id = %id, "Room not found");
                None
            }
        }
    }

    /// Ids of all live rooms.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<RoomId> {
        let rooms = self.rooms.lock().unwrap();
        rooms.keys().copied().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
