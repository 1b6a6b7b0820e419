//! # Arena Engine
//!
//! Backend for a turn-based mech battle game: players queue for fights against
//! each other or AI opponents, earn XP and credits, upgrade their stats and
//! enter scheduled elimination tournaments.
//!
//! ## Architecture
//!
//! The API is built using the Rocket web framework with OpenAPI documentation
//! support. All shared state lives behind [`engine::GameEngine`], which holds
//! one repository per entity kind. Each repository keeps an outer map lock and
//! a lock per record, so concurrent requests touching different players or
//! battles never wait on each other. Matchmaking and tournament scheduling run
//! as background loops started when the server lifts off.

// Rocket makes this a bit tricky to support
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate rocket;

use rocket::fairing::AdHoc;
use rocket::futures::lock::Mutex;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

pub mod battle;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod health;
pub mod matchmaking;
pub mod player;
pub mod scheduler;
pub mod status_messages;
pub mod tournament;

use crate::config::EngineConfig;
use crate::engine::GameEngine;
use crate::scheduler::{spawn_background_tasks, BackgroundTasks};

/// Handle to the running background loops, filled in at liftoff.
#[derive(Default)]
struct BackgroundSlot(Mutex<Option<BackgroundTasks>>);

/// Initializes and configures the Rocket web server with all routes and OpenAPI documentation.
///
/// Engine settings are read from the `engine` table of the Rocket figment
/// (`Rocket.toml` or `ROCKET_ENGINE=...`).
///
/// # Example
///
/// ```no_run
/// use arena_engine::rocket_initialize;
///
/// #[rocket::main]
/// async fn main() {
///     rocket_initialize().launch().await.expect("Failed to launch rocket");
/// }
/// ```
pub fn rocket_initialize() -> rocket::Rocket<rocket::Build> {
    #[allow(clippy::no_effect_underscore_binding)]
    let _ = env_logger::try_init();

    let rocket = rocket::build();
    let config = EngineConfig::from_figment(rocket.figment());
    rocket_with_engine(rocket, GameEngine::new(config))
}

/// Mount the API on `rocket` around an already constructed engine.
pub fn rocket_with_engine(
    rocket: rocket::Rocket<rocket::Build>,
    engine: GameEngine,
) -> rocket::Rocket<rocket::Build> {
    use crate::battle::endpoints::okapi_add_operation_for_get_battle_;
    use crate::battle::endpoints::okapi_add_operation_for_start_battle_;
    use crate::battle::endpoints::{get_battle, start_battle};
    use crate::health::health_check;
    use crate::health::okapi_add_operation_for_health_check_;
    use crate::player::endpoints::okapi_add_operation_for_get_player_;
    use crate::player::endpoints::okapi_add_operation_for_get_player_battle_;
    use crate::player::endpoints::okapi_add_operation_for_upgrade_stat_;
    use crate::player::endpoints::{get_player, get_player_battle, upgrade_stat};
    use crate::tournament::endpoints::okapi_add_operation_for_create_tournament_;
    use crate::tournament::endpoints::okapi_add_operation_for_get_tournament_;
    use crate::tournament::endpoints::okapi_add_operation_for_join_tournament_;
    use crate::tournament::endpoints::okapi_add_operation_for_list_tournaments_;
    use crate::tournament::endpoints::{
        create_tournament, get_tournament, join_tournament, list_tournaments,
    };

    rocket
        .mount(
            "/",
            openapi_get_routes![
                health_check,
                start_battle,
                get_battle,
                get_player,
                get_player_battle,
                upgrade_stat,
                list_tournaments,
                create_tournament,
                get_tournament,
                join_tournament
            ],
        )
        .mount("/swagger", make_swagger_ui(&get_docs()))
        .manage(engine)
        .manage(BackgroundSlot::default())
        .attach(AdHoc::on_liftoff("background-loops", |rocket| {
            Box::pin(async move {
                if let (Some(engine), Some(slot)) = (
                    rocket.state::<GameEngine>(),
                    rocket.state::<BackgroundSlot>(),
                ) {
                    *slot.0.lock().await = Some(spawn_background_tasks(engine));
                }
            })
        }))
        .attach(AdHoc::on_shutdown("background-loops-shutdown", |rocket| {
            Box::pin(async move {
                if let Some(slot) = rocket.state::<BackgroundSlot>() {
                    let tasks = slot.0.lock().await.take();
                    if let Some(tasks) = tasks {
                        tasks.shutdown().await;
                    }
                }
            })
        }))
}

fn get_docs() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}
