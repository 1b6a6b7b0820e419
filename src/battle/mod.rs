//! Battle sessions: records, the turn loop and reward settlement.

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::combat::Difficulty;

pub mod endpoints;
pub mod manager;
pub mod rewards;
pub mod simulation;

pub use manager::{BattleHandle, BattleManager};
pub use simulation::{BattleSimulation, Fighter};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum BattleKind {
    Pvp,
    Pve,
    Tournament,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum BattleStatus {
    Active,
    Completed,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum Winner {
    Participant(String),
    Draw,
}

impl Winner {
    pub fn participant(&self) -> Option<&str> {
        match self {
            Winner::Participant(id) => Some(id),
            Winner::Draw => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleEvent {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub is_ai: bool,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattleRecord {
    pub id: String,
    pub player1: Participant,
    pub player2: Participant,
    pub kind: BattleKind,
    pub status: BattleStatus,
    pub events: Vec<BattleEvent>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_secs: Option<f64>,
    pub winner: Option<Winner>,
    /// Tier of the AI side in PvE battles.
    pub ai_difficulty: Option<Difficulty>,
    pub tournament_id: Option<String>,
    pub match_id: Option<String>,
}

impl BattleRecord {
    pub fn new(id: String, player1: Participant, player2: Participant, kind: BattleKind) -> Self {
        BattleRecord {
            id,
            player1,
            player2,
            kind,
            status: BattleStatus::Active,
            events: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
            duration_secs: None,
            winner: None,
            ai_difficulty: None,
            tournament_id: None,
            match_id: None,
        }
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.player1.id == player_id || self.player2.id == player_id
    }

    pub fn is_active(&self) -> bool {
        self.status == BattleStatus::Active
    }

    pub fn name_of(&self, participant_id: &str) -> &str {
        if self.player1.id == participant_id {
            &self.player1.name
        } else if self.player2.id == participant_id {
            &self.player2.name
        } else {
            "Unknown Player"
        }
    }

    pub fn log_event(&mut self, message: impl Into<String>) {
        self.events.push(BattleEvent {
            timestamp: Utc::now(),
            message: message.into(),
        });
    }

    /// Declare the winner and close the session. A winner, once set, never changes:
    /// returns `false` and leaves the record untouched if one was already declared.
    pub fn conclude(&mut self, winner: Winner) -> bool {
        if self.winner.is_some() {
            return false;
        }
        let end = Utc::now();
        self.winner = Some(winner);
        self.status = BattleStatus::Completed;
        self.end_time = Some(end);
        self.duration_secs = Some((end - self.start_time).num_milliseconds() as f64 / 1000.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str) -> Participant {
        Participant {
            id: id.to_string(),
            name: format!("Player_{}", id),
            is_ai: false,
        }
    }

    #[test]
    fn winner_is_immutable_once_set() {
        let mut record = BattleRecord::new(
            "battle_1".into(),
            participant("a"),
            participant("b"),
            BattleKind::Pvp,
        );
        assert!(record.is_active());
        assert!(record.conclude(Winner::Participant("a".into())));
        assert!(!record.conclude(Winner::Draw));
        assert_eq!(record.winner, Some(Winner::Participant("a".into())));
        assert_eq!(record.status, BattleStatus::Completed);
        assert!(record.duration_secs.is_some());
    }

    #[test]
    fn names_resolve_by_participant() {
        let record = BattleRecord::new(
            "battle_2".into(),
            participant("a"),
            participant("b"),
            BattleKind::Pvp,
        );
        assert_eq!(record.name_of("b"), "Player_b");
        assert_eq!(record.name_of("zz"), "Unknown Player");
        assert!(record.involves("a"));
        assert!(!record.involves("c"));
    }
}
