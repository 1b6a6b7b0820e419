use either::{Either, Left, Right};
use rocket::response::status::{BadRequest, Created, NotFound};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

use super::Tournament;
use crate::combat::Difficulty;
use crate::engine::GameEngine;
use crate::status_messages::{error_status, success_status, Status};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct CreateTournamentRequest {
    pub name: String,
    pub difficulty: Difficulty,
    pub entry_fee: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct JoinRequest {
    pub player_id: String,
}

#[openapi]
#[get("/tournaments")]
pub async fn list_tournaments(engine: &State<GameEngine>) -> Json<Vec<Tournament>> {
    Json(engine.list_tournaments().await)
}

/// Create a tournament on demand; it starts after the configured lead time.
#[openapi]
#[post("/tournaments", format = "json", data = "<request>")]
pub async fn create_tournament(
    request: Json<CreateTournamentRequest>,
    engine: &State<GameEngine>,
) -> Created<Json<Tournament>> {
    let tournament = engine
        .create_tournament(&request.name, request.difficulty, request.entry_fee)
        .await;
    Created::new(format!("/tournament/{}", tournament.id)).body(Json(tournament))
}

#[openapi]
#[get("/tournament/<tournament_id>")]
pub async fn get_tournament(
    tournament_id: &str,
    engine: &State<GameEngine>,
) -> Result<Json<Tournament>, NotFound<Json<Status>>> {
    engine
        .tournaments
        .get(tournament_id)
        .await
        .map(Json)
        .map_err(|e| NotFound(error_status(&e)))
}

/// Pay the entry fee and register for a scheduled tournament.
#[openapi]
#[post("/tournament/<tournament_id>/join", format = "json", data = "<request>")]
pub async fn join_tournament(
    tournament_id: &str,
    request: Json<JoinRequest>,
    engine: &State<GameEngine>,
) -> Result<Json<Status>, Either<NotFound<Json<Status>>, BadRequest<Json<Status>>>> {
    match engine
        .join_tournament(&request.player_id, tournament_id)
        .await
    {
        Ok(()) => Ok(success_status("Joined tournament")),
        Err(e) if e.is_not_found() => Err(Left(NotFound(error_status(&e)))),
        Err(e) => Err(Right(BadRequest(error_status(&e)))),
    }
}
