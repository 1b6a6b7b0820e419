use rocket::response::status::NotFound;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

use super::BattleRecord;
use crate::engine::GameEngine;
use crate::matchmaking::QueueTicket;
use crate::status_messages::{error_status, Status};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleRequest {
    pub player_id: String,
}

/// Queue the player for the next matchmaking pass.
#[openapi]
#[post("/battle", format = "json", data = "<request>")]
pub async fn start_battle(
    request: Json<BattleRequest>,
    engine: &State<GameEngine>,
) -> Json<QueueTicket> {
    Json(engine.submit_for_battle(&request.player_id).await)
}

/// Battle record while active or inside its grace period.
#[openapi]
#[get("/battle/<battle_id>")]
pub async fn get_battle(
    battle_id: &str,
    engine: &State<GameEngine>,
) -> Result<Json<BattleRecord>, NotFound<Json<Status>>> {
    engine
        .get_battle_status(battle_id)
        .await
        .map(Json)
        .map_err(|e| NotFound(error_status(&e)))
}
