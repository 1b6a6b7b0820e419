//! Engine tuning knobs.
//!
//! Values are read from the Rocket figment under the `engine` key, so they can be
//! set in `Rocket.toml`:
//!
//! ```toml
//! [default.engine]
//! matchmaking_interval_secs = 5
//! turn_pacing_ms = 1000
//! seed = 42
//! ```
//!
//! Every field has a default, so a missing table yields [`EngineConfig::default`].

use std::time::Duration;

use chrono::Weekday;
use log::warn;
use rocket::figment::Figment;
use rocket::serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde", default)]
pub struct EngineConfig {
    pub matchmaking_interval_secs: u64,
    pub matchmaking_backoff_secs: u64,
    pub scheduler_interval_secs: u64,
    pub scheduler_backoff_secs: u64,
    pub turn_pacing_ms: u64,
    pub match_pacing_ms: u64,
    pub battle_grace_secs: u64,
    pub tournament_match_grace_secs: u64,
    pub tournament_retention_secs: u64,
    pub max_turns: u32,
    pub ai_pool_size: usize,
    /// UTC hour at which the daily championship is created.
    pub daily_hour: u32,
    pub weekly_weekday: Weekday,
    pub weekly_hour: u32,
    pub tournament_lead_mins: i64,
    pub tournament_window_mins: i64,
    /// Fixed RNG seed; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            matchmaking_interval_secs: 5,
            matchmaking_backoff_secs: 10,
            scheduler_interval_secs: 60,
            scheduler_backoff_secs: 120,
            turn_pacing_ms: 1000,
            match_pacing_ms: 1000,
            battle_grace_secs: 30,
            tournament_match_grace_secs: 10,
            tournament_retention_secs: 3600,
            max_turns: 20,
            ai_pool_size: 20,
            daily_hour: 20,
            weekly_weekday: Weekday::Sun,
            weekly_hour: 18,
            tournament_lead_mins: 60,
            tournament_window_mins: 120,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Extract the `engine` table from a Rocket figment, falling back to defaults.
    pub fn from_figment(figment: &Figment) -> Self {
        if !figment.contains("engine") {
            return EngineConfig::default();
        }
        match figment.extract_inner::<EngineConfig>("engine") {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid engine configuration, using defaults: {}", e);
                EngineConfig::default()
            }
        }
    }

    pub fn matchmaking_interval(&self) -> Duration {
        Duration::from_secs(self.matchmaking_interval_secs)
    }

    pub fn matchmaking_backoff(&self) -> Duration {
        Duration::from_secs(self.matchmaking_backoff_secs)
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler_interval_secs)
    }

    pub fn scheduler_backoff(&self) -> Duration {
        Duration::from_secs(self.scheduler_backoff_secs)
    }

    pub fn turn_pacing(&self) -> Duration {
        Duration::from_millis(self.turn_pacing_ms)
    }

    pub fn match_pacing(&self) -> Duration {
        Duration::from_millis(self.match_pacing_ms)
    }

    pub fn battle_grace(&self) -> Duration {
        Duration::from_secs(self.battle_grace_secs)
    }

    pub fn tournament_match_grace(&self) -> Duration {
        Duration::from_secs(self.tournament_match_grace_secs)
    }

    pub fn tournament_retention(&self) -> Duration {
        Duration::from_secs(self.tournament_retention_secs)
    }

    pub fn tournament_lead(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.tournament_lead_mins)
    }

    pub fn tournament_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.tournament_window_mins)
    }
}
