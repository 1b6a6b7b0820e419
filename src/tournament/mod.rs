//! Single-elimination tournaments.
//!
//! Lifecycle: `Scheduled -> Running -> Completed`. Players join while scheduled
//! (paying the entry fee), the prize pool is fixed when the tournament starts,
//! rounds are played until at most two entrants remain, and finalisation pays
//! 70% of the pool to the winner and 20% to the runner-up.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::combat::Difficulty;

pub mod bracket;
pub mod endpoints;
pub mod manager;
pub mod schedule;

pub use manager::TournamentManager;

pub const SPONSORS: [&str; 8] = [
    "TechCorp",
    "Quantum Industries",
    "Nova Systems",
    "CyberDyne",
    "OmniCorp",
    "Apex Technologies",
    "FutureTech",
    "NeoArmaments",
];

pub fn random_sponsor<R: Rng + ?Sized>(rng: &mut R) -> String {
    SPONSORS.choose(rng).unwrap_or(&SPONSORS[0]).to_string()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum TournamentStatus {
    Scheduled,
    Running,
    Completed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Running,
    Completed,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct TournamentMatch {
    pub id: String,
    pub round: u32,
    pub player1: String,
    pub player2: String,
    pub status: MatchStatus,
    pub winner: Option<String>,
    pub battle_id: Option<String>,
}

impl TournamentMatch {
    /// The participant who did not win, once decided.
    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        Some(if winner == self.player1 {
            &self.player2
        } else {
            &self.player1
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Payout {
    pub winner: String,
    pub winner_prize: u64,
    pub runner_up: String,
    pub runner_up_prize: u64,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub entry_fee: u64,
    pub created_at: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: TournamentStatus,
    pub participants: Vec<String>,
    pub matches: Vec<TournamentMatch>,
    pub prize_pool: u64,
    pub sponsor: String,
    pub winner: Option<String>,
    pub runner_up: Option<String>,
}

impl Tournament {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        name: &str,
        difficulty: Difficulty,
        entry_fee: u64,
        created_at: DateTime<Utc>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        sponsor: String,
    ) -> Self {
        Tournament {
            id,
            name: name.to_string(),
            difficulty,
            entry_fee,
            created_at,
            start_time,
            end_time,
            status: TournamentStatus::Scheduled,
            participants: Vec::new(),
            matches: Vec::new(),
            prize_pool: 0,
            sponsor,
            winner: None,
            runner_up: None,
        }
    }

    /// Move to `Running`, fixing the prize pool. Returns `false` if not scheduled.
    pub fn begin(&mut self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        if self.status != TournamentStatus::Scheduled {
            return false;
        }
        self.status = TournamentStatus::Running;
        self.start_time = now;
        self.end_time = now + window;
        self.prize_pool = self.entry_fee * self.participants.len() as u64;
        true
    }

    /// Highest round with matches so far; 0 before the first round.
    pub fn current_round(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// Who plays in `round`: registrants for round 1, previous winners afterwards.
    pub fn round_entrants(&self, round: u32) -> Vec<String> {
        if round <= 1 {
            return self.participants.clone();
        }
        self.matches
            .iter()
            .filter(|m| m.round == round - 1)
            .filter_map(|m| m.winner.clone())
            .collect()
    }

    /// First match of the highest round.
    pub fn final_match(&self) -> Option<&TournamentMatch> {
        let last_round = self.current_round();
        self.matches.iter().find(|m| m.round == last_round)
    }

    pub fn match_mut(&mut self, match_id: &str) -> Option<&mut TournamentMatch> {
        self.matches.iter_mut().find(|m| m.id == match_id)
    }

    /// Close a running tournament and record winner and runner-up from the final
    /// match. Returns `false` if the tournament was not running.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != TournamentStatus::Running {
            return false;
        }
        self.status = TournamentStatus::Completed;
        self.end_time = now;
        if let Some(final_match) = self.final_match() {
            let winner = final_match.winner.clone();
            let runner_up = final_match.loser().map(str::to_string);
            self.winner = winner;
            self.runner_up = runner_up;
        }
        true
    }

    /// Prize money owed once completed with a decided final.
    pub fn payout(&self) -> Option<Payout> {
        if self.status != TournamentStatus::Completed {
            return None;
        }
        let (winner_prize, runner_up_prize) = bracket::prize_split(self.prize_pool);
        Some(Payout {
            winner: self.winner.clone()?,
            winner_prize,
            runner_up: self.runner_up.clone()?,
            runner_up_prize,
        })
    }
}
