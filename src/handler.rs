// HTTP handler bindings for the Tic-Tac-Toe API
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's core logic methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Mapping game errors onto HTTP status codes

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use tic_tac_toe_minimax::bot::Bot;
use tic_tac_toe_minimax::error::GameError;
use tic_tac_toe_minimax::types::{MoveRequest, NewGameRequest};

type ApiResult = Result<Json<Value>, Custom<Json<Value>>>;

fn error_status(error: &GameError) -> Status {
    match error {
        GameError::UnknownSession(_) => Status::NotFound,
        GameError::GameOver => Status::Conflict,
        GameError::InvalidBoardSize { .. }
        | GameError::OutOfBounds { .. }
        | GameError::CellOccupied { .. } => Status::UnprocessableEntity,
        GameError::SearchTask(_) => Status::InternalServerError,
    }
}

fn respond(result: Result<Value, GameError>) -> ApiResult {
    result
        .map(Json)
        .map_err(|e| Custom(error_status(&e), Json(json!({ "error": e.to_string() }))))
}

/// GET / endpoint
/// Returns service metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /games endpoint
/// Starts a new game session
#[post("/games", format = "json", data = "<new_game>")]
pub fn new_game(bot: &rocket::State<Bot>, new_game: Json<NewGameRequest>) -> ApiResult {
    respond(bot.new_game(&new_game))
}

/// GET /games/<id> endpoint
/// Returns the board and status of a game
#[get("/games/<id>")]
pub fn get_game(bot: &rocket::State<Bot>, id: &str) -> ApiResult {
    respond(bot.state(id))
}

/// POST /games/<id>/move endpoint
/// Plays the human move and the computer's reply
#[post("/games/<id>/move", format = "json", data = "<move_req>")]
pub async fn play_move(bot: &rocket::State<Bot>, id: &str, move_req: Json<MoveRequest>) -> ApiResult {
    respond(bot.play_turn(id, move_req.row, move_req.col).await)
}

/// DELETE /games/<id> endpoint
/// Discards a game session
#[delete("/games/<id>")]
pub fn end_game(bot: &rocket::State<Bot>, id: &str) -> ApiResult {
    respond(bot.end(id))
}
