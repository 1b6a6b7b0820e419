use rocket::http::{ContentType, Status};
use rocket::local::blocking::{Client, LocalResponse};
use rocket::serde::json::{serde_json, Value};

use arena_engine::config::EngineConfig;
use arena_engine::engine::GameEngine;
use arena_engine::matchmaking::QueueTicket;
use arena_engine::player::PlayerRecord;
use arena_engine::rocket_with_engine;
use arena_engine::status_messages::Status as StatusBody;
use arena_engine::tournament::Tournament;

fn client() -> Client {
    // Keep the background loops out of the way of request-driven assertions.
    let config = EngineConfig {
        matchmaking_interval_secs: 3600,
        scheduler_interval_secs: 3600,
        seed: Some(5),
        ..EngineConfig::default()
    };
    let rocket = rocket_with_engine(rocket::build(), GameEngine::new(config));
    Client::tracked(rocket).expect("valid rocket instance")
}

fn post_json<'c>(client: &'c Client, uri: &str, body: Value) -> LocalResponse<'c> {
    client
        .post(uri.to_string())
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
}

#[test]
fn health_reports_ok() {
    let client = client();
    let response = client.get("/health").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body["status"], "ok");
    assert!(body["server_time"].is_string());
}

#[test]
fn player_lifecycle_over_http() {
    let client = client();

    let response = client.get("/player/alice").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let alice: PlayerRecord = response.into_json().expect("player json");
    assert_eq!(alice.level, 1);
    assert_eq!(alice.credits, 100);
    assert_eq!(alice.name, "Player_alice");

    let response = post_json(
        &client,
        "/player/alice/upgrade",
        serde_json::json!({ "stat": "health" }),
    );
    assert_eq!(response.status(), Status::BadRequest);
    let body: StatusBody = response.into_json().expect("status json");
    assert_eq!(body.code, "no_skill_points");

    let response = client.get("/player/alice/battle").dispatch();
    assert_eq!(response.status(), Status::Ok);
}

#[test]
fn battle_queue_and_lookup() {
    let client = client();

    let response = post_json(&client, "/battle", serde_json::json!({ "player_id": "bob" }));
    assert_eq!(response.status(), Status::Ok);
    let ticket: QueueTicket = response.into_json().expect("ticket json");
    assert_eq!(ticket.status, "queued");
    assert_eq!(ticket.message, "Looking for opponent...");

    let response = client.get("/battle/battle_999").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    let body: StatusBody = response.into_json().expect("status json");
    assert_eq!(body.code, "battle_not_found");
}

#[test]
fn tournament_create_list_and_join() {
    let client = client();

    let response = post_json(
        &client,
        "/tournaments",
        serde_json::json!({ "name": "Open Cup", "difficulty": "easy", "entry_fee": 60 }),
    );
    assert_eq!(response.status(), Status::Created);
    let created: Tournament = response.into_json().expect("tournament json");
    assert_eq!(created.entry_fee, 60);

    let listed: Vec<Tournament> = client
        .get("/tournaments")
        .dispatch()
        .into_json()
        .expect("list json");
    assert!(listed.iter().any(|t| t.id == created.id && t.name == "Open Cup"));

    let join_uri = format!("/tournament/{}/join", created.id);
    let response = post_json(&client, &join_uri, serde_json::json!({ "player_id": "carol" }));
    assert_eq!(response.status(), Status::Ok);

    // 40 credits left, second entry costs 60.
    let response = post_json(&client, &join_uri, serde_json::json!({ "player_id": "carol" }));
    assert_eq!(response.status(), Status::BadRequest);
    let body: StatusBody = response.into_json().expect("status json");
    assert_eq!(body.code, "insufficient_funds");

    let response = post_json(
        &client,
        "/tournament/tournament_404/join",
        serde_json::json!({ "player_id": "carol" }),
    );
    assert_eq!(response.status(), Status::NotFound);

    let fetched: Tournament = client
        .get(format!("/tournament/{}", created.id))
        .dispatch()
        .into_json()
        .expect("tournament json");
    assert_eq!(fetched.participants, vec!["carol".to_string()]);
}

#[test]
fn openapi_document_is_served() {
    let client = client();
    let response = client.get("/openapi.json").dispatch();
    assert_eq!(response.status(), Status::Ok);
}
