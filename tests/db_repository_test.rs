//! Tests for database repository operations.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use tictactoe_rooms::{
    ActiveSlot, GameRepository, Player, PlayerId, Room, RoomId, Symbol,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = GameRepository::new(db_path);
    (db_file, repo)
}

#[test]
fn test_create_player() {
    let (_db, repo) = setup_test_db();
    let id = PlayerId::new();
    let row = repo.create_player(id, "Andrew").expect("Create failed");
    assert_eq!(row.name(), "Andrew");
    assert_eq!(row.id(), &id.to_string());
    assert!(row.symbol().is_none());
}

#[test]
fn test_create_player_duplicate_id_fails() {
    let (_db, repo) = setup_test_db();
    let id = PlayerId::new();
    repo.create_player(id, "Andrew").expect("First create failed");
    assert!(repo.create_player(id, "Andrew").is_err());
}

#[test]
fn test_get_player_found_and_missing() {
    let (_db, repo) = setup_test_db();
    let id = PlayerId::new();
    repo.create_player(id, "Ashley").expect("Create failed");

    let found = repo.get_player(id).expect("Query failed");
    assert_eq!(found.expect("Player missing").name(), "Ashley");

    let missing = repo.get_player(PlayerId::new()).expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_list_players_ordered_by_creation() {
    let (_db, repo) = setup_test_db();
    repo.create_player(PlayerId::new(), "Alpha").expect("Create failed");
    repo.create_player(PlayerId::new(), "Beta").expect("Create failed");

    let rows = repo.list_players().expect("List failed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name(), "Alpha");
    assert_eq!(rows[1].name(), "Beta");
}

#[test]
fn test_set_player_symbol() {
    let (_db, repo) = setup_test_db();
    let id = PlayerId::new();
    repo.create_player(id, "Andrew").expect("Create failed");
    repo.set_player_symbol(id, Symbol::X).expect("Update failed");

    let row = repo.get_player(id).expect("Query failed").expect("Missing");
    assert_eq!(row.symbol().as_deref(), Some("X"));
    assert_eq!(row.parse_symbol().expect("Parse failed"), Some(Symbol::X));
}

#[test]
fn test_room_snapshot_round_trips_grid_and_marker() {
    let (_db, repo) = setup_test_db();
    let andrew = PlayerId::new();
    let ashley = PlayerId::new();
    repo.create_player(andrew, "Andrew").expect("Create failed");
    repo.create_player(ashley, "Ashley").expect("Create failed");

    let mut room = Room::new(RoomId::new(), Player::new(andrew, "Andrew"));
    room.add_player(Player::new(ashley, "Ashley")).expect("Join failed");
    room.make_play(andrew, 1, 1).expect("Play failed");
    room.make_play(ashley, 2, 2).expect("Play failed");
    room.make_play(andrew, 3, 1).expect("Play failed");

    repo.save_room(&room).expect("Save failed");
    let loaded = repo
        .load_room(room.id())
        .expect("Load failed")
        .expect("Snapshot missing");

    // The grid and active-player marker must round-trip exactly.
    assert_eq!(loaded.board(), room.board());
    assert_eq!(loaded.active_slot(), ActiveSlot::Second);
    assert_eq!(loaded.first_player().id(), andrew);
    assert_eq!(loaded.second_player().expect("Second missing").id(), ashley);
    assert_eq!(loaded.first_player().symbol(), Ok(Symbol::X));
}

#[test]
fn test_save_room_records_assigned_symbols() {
    let (_db, repo) = setup_test_db();
    let andrew = PlayerId::new();
    let ashley = PlayerId::new();
    repo.create_player(andrew, "Andrew").expect("Create failed");
    repo.create_player(ashley, "Ashley").expect("Create failed");

    let mut room = Room::new(RoomId::new(), Player::new(andrew, "Andrew"));
    room.add_player(Player::new(ashley, "Ashley")).expect("Join failed");
    repo.save_room(&room).expect("Save failed");

    let first = repo.get_player(andrew).expect("Query failed").expect("Missing");
    let second = repo.get_player(ashley).expect("Query failed").expect("Missing");
    assert_eq!(first.symbol().as_deref(), Some("X"));
    assert_eq!(second.symbol().as_deref(), Some("O"));
}

#[test]
fn test_save_room_upserts_latest_state() {
    let (_db, repo) = setup_test_db();
    let andrew = PlayerId::new();
    let ashley = PlayerId::new();
    repo.create_player(andrew, "Andrew").expect("Create failed");
    repo.create_player(ashley, "Ashley").expect("Create failed");

    let mut room = Room::new(RoomId::new(), Player::new(andrew, "Andrew"));
    repo.save_room(&room).expect("First save failed");

    room.add_player(Player::new(ashley, "Ashley")).expect("Join failed");
    room.make_play(andrew, 2, 2).expect("Play failed");
    repo.save_room(&room).expect("Second save failed");

    let loaded = repo
        .load_room(room.id())
        .expect("Load failed")
        .expect("Snapshot missing");
    assert_eq!(loaded.board(), room.board());
    assert_eq!(loaded.active_slot(), ActiveSlot::Second);
}

#[test]
fn test_load_room_missing_returns_none() {
    let (_db, repo) = setup_test_db();
    let loaded = repo.load_room(RoomId::new()).expect("Load failed");
    assert!(loaded.is_none());
}
