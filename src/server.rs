//! REST API over rooms and players.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRepository};
use crate::game::{GameError, Outcome, Player, PlayerId, Room, RoomId, Symbol};
use crate::registry::RoomRegistry;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: RoomRegistry,
    repository: GameRepository,
}

impl AppState {
    /// Creates the server state from its two collaborators.
    pub fn new(registry: RoomRegistry, repository: GameRepository) -> Self {
        Self {
            registry,
            repository,
        }
    }
}

/// Request body for registering a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    /// Display name for the new player.
    pub name: String,
}

/// Request body for creating a room or joining one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdRequest {
    /// The player's id.
    pub player_id: PlayerId,
}

/// Request body for making a play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    /// The player attempting the play.
    pub player_id: PlayerId,
    /// 1-based row.
    pub row: u8,
    /// 1-based column.
    pub col: u8,
}

/// One occupant of a full room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResponse {
    /// The player's id.
    pub player_id: PlayerId,
    /// The player's display name.
    pub name: String,
    /// The player's assigned symbol.
    pub symbol: Symbol,
}

/// Game outcome as reported by `GET /rooms/{room_id}/board`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeResponse {
    /// The game continues.
    Ongoing,
    /// A player completed a winning line.
    Won {
        /// The winner's id.
        winner: PlayerId,
    },
    /// The grid is full with no winning line.
    Stalemate,
}

impl From<Outcome> for OutcomeResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Ongoing => OutcomeResponse::Ongoing,
            Outcome::WonBy(winner) => OutcomeResponse::Won { winner },
            Outcome::Stalemate => OutcomeResponse::Stalemate,
        }
    }
}

/// Failure of an API operation, translated to a transport response.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// A rejected game operation.
    #[display("{_0}")]
    Game(GameError),
    /// A persistence failure.
    #[display("{_0}")]
    Db(DbError),
    /// No player record with the given id.
    #[display("Player with given id not found")]
    #[from(ignore)]
    PlayerNotFound,
    /// No live room or snapshot with the given id.
    #[display("Room with given id not found")]
    #[from(ignore)]
    RoomNotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Game(e) => match e {
                GameError::OutOfRange => StatusCode::NOT_ACCEPTABLE,
                GameError::CellOccupied => StatusCode::BAD_REQUEST,
                GameError::NotYourTurn => StatusCode::FORBIDDEN,
                GameError::DuplicatePlayer => StatusCode::NOT_ACCEPTABLE,
                GameError::RoomAlreadyFull => StatusCode::NOT_ACCEPTABLE,
                GameError::RoomIncomplete => StatusCode::BAD_REQUEST,
                GameError::SymbolNotAssigned => StatusCode::CONFLICT,
            },
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PlayerNotFound | ApiError::RoomNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Request failed with server error");
        } else {
            debug!(error = %self, status = %status, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/players", post(create_player))
        .route("/rooms", post(create_room))
        .route("/rooms/{room_id}/players/add", put(add_player))
        .route("/rooms/{room_id}/players", get(get_players))
        .route("/rooms/{room_id}/board", put(make_play).get(resolve_outcome))
        .with_state(state)
}

/// `POST /players` - registers a player and returns its id.
#[instrument(skip(state, req), fields(name = %req.name))]
async fn create_player(
    State(state): State<AppState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerId>), ApiError> {
    let id = PlayerId::new();
    state.repository.create_player(id, &req.name)?;
    info!(player_id = %id, name = %req.name, "Player registered");
    Ok((StatusCode::CREATED, Json(id)))
}

/// `POST /rooms` - opens a room with the given player as first occupant.
#[instrument(skip(state, req), fields(player_id = %req.player_id))]
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<PlayerIdRequest>,
) -> Result<(StatusCode, Json<RoomId>), ApiError> {
    let first = load_player(&state, req.player_id)?;
    let room = Room::new(RoomId::new(), first);
    let room_id = room.id();

    state.repository.save_room(&room)?;
    state.registry.insert(room);

    info!(room_id = %room_id, first_player = %req.player_id, "Room created");
    Ok((StatusCode::CREATED, Json(room_id)))
}

/// `PUT /rooms/{room_id}/players/add` - attaches the second player.
#[instrument(skip(state, req), fields(room_id = %room_id, player_id = %req.player_id))]
async fn add_player(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    Json(req): Json<PlayerIdRequest>,
) -> Result<StatusCode, ApiError> {
    ensure_live(&state, room_id)?;
    let candidate = load_player(&state, req.player_id)?;

    state
        .registry
        .with_room_mut(room_id, |room| -> Result<(), ApiError> {
            room.add_player(candidate)?;
            // Snapshot under the same lock hold as the mutation, so
            // snapshots for a room commit in mutation order.
            state.repository.save_room(room)?;
            Ok(())
        })
        .ok_or(ApiError::RoomNotFound)??;

    info!(room_id = %room_id, player_id = %req.player_id, "Second player joined");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /rooms/{room_id}/players` - lists both occupants of a full room.
#[instrument(skip(state))]
async fn get_players(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    ensure_live(&state, room_id)?;

    let players = state
        .registry
        .with_room(room_id, |room| -> Result<_, GameError> {
            let occupants = room.players()?;
            occupants
                .iter()
                .map(|p| {
                    Ok(PlayerResponse {
                        player_id: p.id(),
                        name: p.name().to_string(),
                        symbol: p.symbol()?,
                    })
                })
                .collect::<Result<Vec<_>, GameError>>()
        })
        .ok_or(ApiError::RoomNotFound)??;

    Ok(Json(players))
}

/// `PUT /rooms/{room_id}/board` - makes a play and returns the grid.
#[instrument(skip(state, req), fields(room_id = %room_id, player_id = %req.player_id, row = req.row, col = req.col))]
async fn make_play(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<[[String; 3]; 3]>, ApiError> {
    ensure_live(&state, room_id)?;
    // 404 for ids the registry has never seen, before the turn check.
    load_player(&state, req.player_id)?;

    let grid = state
        .registry
        .with_room_mut(room_id, |room| -> Result<_, ApiError> {
            room.make_play(req.player_id, req.row, req.col)?;
            // Snapshot under the same lock hold as the mutation, so
            // snapshots for a room commit in mutation order.
            state.repository.save_room(room)?;
            Ok(room.board().grid())
        })
        .ok_or(ApiError::RoomNotFound)??;

    info!(room_id = %room_id, player_id = %req.player_id, "Play accepted");
    Ok(Json(grid))
}

/// `GET /rooms/{room_id}/board` - reports the game outcome.
#[instrument(skip(state))]
async fn resolve_outcome(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<OutcomeResponse>, ApiError> {
    ensure_live(&state, room_id)?;

    let outcome = state
        .registry
        .with_room(room_id, |room| room.resolve_outcome())
        .ok_or(ApiError::RoomNotFound)?;

    debug!(room_id = %room_id, outcome = ?outcome, "Outcome resolved");
    Ok(Json(outcome.into()))
}

/// Fetches a player record and turns it into a fresh (symbol-less)
/// domain player.
fn load_player(state: &AppState, id: PlayerId) -> Result<Player, ApiError> {
    let row = state
        .repository
        .get_player(id)?
        .ok_or(ApiError::PlayerNotFound)?;
    Ok(Player::new(id, row.name().clone()))
}

/// Makes sure the room is live in the registry, rehydrating it from its
/// persisted snapshot if this process has not seen it yet.
fn ensure_live(state: &AppState, room_id: RoomId) -> Result<(), ApiError> {
    if state.registry.contains(room_id) {
        return Ok(());
    }
    match state.repository.load_room(room_id)? {
        Some(room) => {
            info!(room_id = %room_id, "Room rehydrated from snapshot");
            // A concurrent request may have rehydrated and mutated the
            // room since the snapshot was read; never replace a live copy.
            state.registry.insert_if_absent(room);
            Ok(())
        }
        None => Err(ApiError::RoomNotFound),
    }
}
