use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

use super::PlayerRecord;
use crate::battle::BattleRecord;
use crate::engine::GameEngine;
use crate::status_messages::{error_status, Status};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct UpgradeRequest {
    pub stat: String,
}

/// Player record, created with defaults on first lookup.
#[openapi]
#[get("/player/<player_id>")]
pub async fn get_player(player_id: &str, engine: &State<GameEngine>) -> Json<PlayerRecord> {
    Json(engine.get_player(player_id).await)
}

/// The battle the player is currently fighting, if any.
#[openapi]
#[get("/player/<player_id>/battle")]
pub async fn get_player_battle(
    player_id: &str,
    engine: &State<GameEngine>,
) -> Json<Option<BattleRecord>> {
    Json(engine.get_player_active_battle(player_id).await)
}

/// Spend a skill point on `health`, `damage`, `armor` or `speed`.
#[openapi]
#[post("/player/<player_id>/upgrade", format = "json", data = "<request>")]
pub async fn upgrade_stat(
    player_id: &str,
    request: Json<UpgradeRequest>,
    engine: &State<GameEngine>,
) -> Result<Json<PlayerRecord>, BadRequest<Json<Status>>> {
    engine
        .upgrade_stat(player_id, &request.stat)
        .await
        .map(Json)
        .map_err(|e| BadRequest(error_status(&e)))
}
