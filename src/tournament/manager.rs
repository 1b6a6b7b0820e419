use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rocket::futures::lock::Mutex;
use rocket::tokio;
use rocket::tokio::task::JoinHandle;

use super::bracket::{decide_match, pair_entrants};
use super::schedule::due_creations;
use super::{random_sponsor, MatchStatus, Tournament, TournamentMatch, TournamentStatus};
use crate::battle::BattleManager;
use crate::combat::{Difficulty, SharedRng};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::player::PlayerRegistry;

/// Owns every tracked tournament and drives brackets in background tasks.
#[derive(Debug)]
pub struct TournamentManager {
    tournaments: Mutex<HashMap<String, Arc<Mutex<Tournament>>>>,
    next_tournament_id: AtomicU64,
    next_match_id: AtomicU64,
    players: Arc<PlayerRegistry>,
    battles: Arc<BattleManager>,
    rng: SharedRng,
    config: EngineConfig,
}

impl TournamentManager {
    pub fn new(
        players: Arc<PlayerRegistry>,
        battles: Arc<BattleManager>,
        rng: SharedRng,
        config: EngineConfig,
    ) -> Self {
        TournamentManager {
            tournaments: Mutex::new(HashMap::new()),
            next_tournament_id: AtomicU64::new(0),
            next_match_id: AtomicU64::new(0),
            players,
            battles,
            rng,
            config,
        }
    }

    async fn slot(&self, tournament_id: &str) -> Result<Arc<Mutex<Tournament>>> {
        self.tournaments
            .lock()
            .await
            .get(tournament_id)
            .cloned()
            .ok_or_else(|| EngineError::TournamentNotFound(tournament_id.to_string()))
    }

    async fn slots(&self) -> Vec<Arc<Mutex<Tournament>>> {
        self.tournaments.lock().await.values().cloned().collect()
    }

    /// Create a tournament that starts after the configured lead time.
    pub async fn create(
        &self,
        name: &str,
        difficulty: Difficulty,
        entry_fee: u64,
        now: DateTime<Utc>,
    ) -> Tournament {
        let id = format!(
            "tournament_{}",
            self.next_tournament_id.fetch_add(1, Ordering::SeqCst) + 1
        );
        let start_time = now + self.config.tournament_lead();
        let sponsor = self.rng.with(|rng| random_sponsor(rng));
        let tournament = Tournament::new(
            id.clone(),
            name,
            difficulty,
            entry_fee,
            now,
            start_time,
            start_time + self.config.tournament_window(),
            sponsor,
        );
        info!(
            "Created tournament {} '{}' starting {} (fee {})",
            id, name, start_time, entry_fee
        );
        self.tournaments
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(tournament.clone())));
        tournament
    }

    pub async fn get(&self, tournament_id: &str) -> Result<Tournament> {
        let slot = self.slot(tournament_id).await?;
        let tournament = slot.lock().await;
        Ok(tournament.clone())
    }

    pub async fn list(&self) -> Vec<Tournament> {
        let mut all = Vec::new();
        for slot in self.slots().await {
            all.push(slot.lock().await.clone());
        }
        all.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        all
    }

    /// Debit the entry fee and register the player. Joining twice is allowed and
    /// charges twice.
    pub async fn join(&self, player_id: &str, tournament_id: &str) -> Result<()> {
        let slot = self.slot(tournament_id).await?;
        let mut tournament = slot.lock().await;
        if tournament.status != TournamentStatus::Scheduled {
            return Err(EngineError::TournamentAlreadyStarted(
                tournament_id.to_string(),
            ));
        }
        self.players.try_debit(player_id, tournament.entry_fee).await?;
        tournament.participants.push(player_id.to_string());
        debug!("{} joined {}", player_id, tournament_id);
        Ok(())
    }

    /// Start a scheduled tournament and play its bracket in the background.
    /// Returns `None` if the tournament is missing or not scheduled.
    pub async fn start(
        self: &Arc<Self>,
        tournament_id: &str,
        now: DateTime<Utc>,
    ) -> Option<JoinHandle<()>> {
        let slot = self.slot(tournament_id).await.ok()?;
        {
            let mut tournament = slot.lock().await;
            if !tournament.begin(now, self.config.tournament_window()) {
                return None;
            }
            info!(
                "Tournament {} started with {} participants, prize pool {}",
                tournament.id,
                tournament.participants.len(),
                tournament.prize_pool
            );
        }
        let manager = Arc::clone(self);
        let id = tournament_id.to_string();
        Some(tokio::spawn(async move { manager.play_bracket(id).await }))
    }

    async fn play_bracket(self: Arc<Self>, tournament_id: String) {
        let Ok(slot) = self.slot(&tournament_id).await else {
            return;
        };
        loop {
            let (round, entrants, matches) = {
                let mut tournament = slot.lock().await;
                if tournament.status != TournamentStatus::Running {
                    return;
                }
                let round = tournament.current_round() + 1;
                let entrants = tournament.round_entrants(round);
                let matches: Vec<TournamentMatch> = pair_entrants(&entrants)
                    .into_iter()
                    .map(|(player1, player2)| TournamentMatch {
                        id: format!(
                            "match_{}",
                            self.next_match_id.fetch_add(1, Ordering::SeqCst) + 1
                        ),
                        round,
                        player1,
                        player2,
                        status: MatchStatus::Scheduled,
                        winner: None,
                        battle_id: None,
                    })
                    .collect();
                tournament.matches.extend(matches.iter().cloned());
                (round, entrants, matches)
            };
            debug!(
                "Tournament {} round {}: {} entrants, {} matches",
                tournament_id,
                round,
                entrants.len(),
                matches.len()
            );

            for m in &matches {
                self.play_match(&slot, &tournament_id, m).await;
                tokio::time::sleep(self.config.match_pacing()).await;
            }

            if entrants.len() <= 2 {
                self.finish(&tournament_id, Utc::now()).await;
                return;
            }
        }
    }

    async fn play_match(
        &self,
        slot: &Arc<Mutex<Tournament>>,
        tournament_id: &str,
        m: &TournamentMatch,
    ) {
        {
            let mut tournament = slot.lock().await;
            if let Some(entry) = tournament.match_mut(&m.id) {
                entry.status = MatchStatus::Running;
            }
        }

        let p1 = self.players.get_or_create(&m.player1).await;
        let p2 = self.players.get_or_create(&m.player2).await;
        let winner = self.rng.with(|rng| decide_match(&p1, &p2, rng));
        let battle = self
            .battles
            .record_tournament_match(tournament_id, &m.id, &p1, &p2, &winner)
            .await;

        let mut tournament = slot.lock().await;
        if let Some(entry) = tournament.match_mut(&m.id) {
            entry.winner = Some(winner);
            entry.status = MatchStatus::Completed;
            entry.battle_id = Some(battle.id);
        }
    }

    /// Finalize a running tournament, credit prizes and schedule its eviction.
    /// Returns `false` if it was not running.
    pub async fn finish(self: &Arc<Self>, tournament_id: &str, now: DateTime<Utc>) -> bool {
        let Ok(slot) = self.slot(tournament_id).await else {
            return false;
        };
        let (name, payout) = {
            let mut tournament = slot.lock().await;
            if !tournament.finalize(now) {
                return false;
            }
            (tournament.name.clone(), tournament.payout())
        };

        match payout {
            Some(payout) => {
                self.players
                    .credit(&payout.winner, payout.winner_prize)
                    .await;
                self.players
                    .credit(&payout.runner_up, payout.runner_up_prize)
                    .await;
                info!(
                    "Tournament '{}' completed! Winner: {} (Prize: {} credits), \
                     Runner-up: {} (Prize: {} credits)",
                    name,
                    payout.winner,
                    payout.winner_prize,
                    payout.runner_up,
                    payout.runner_up_prize
                );
            }
            None => info!("Tournament '{}' completed without a final", name),
        }

        let manager = Arc::clone(self);
        let id = tournament_id.to_string();
        let retention = self.config.tournament_retention();
        tokio::spawn(async move {
            tokio::time::sleep(retention).await;
            if manager.tournaments.lock().await.remove(&id).is_some() {
                debug!("Evicted tournament {}", id);
            }
        });
        true
    }

    /// One scheduler pass: create due recurring tournaments, start those whose
    /// start time has come and close those whose window has passed.
    pub async fn tick(self: &Arc<Self>, now: DateTime<Utc>) {
        let existing: Vec<(String, chrono::NaiveDate)> = self
            .list()
            .await
            .into_iter()
            .map(|t| (t.name, t.created_at.date_naive()))
            .collect();
        for template in due_creations(now, &self.config, &existing) {
            self.create(template.name, template.difficulty, template.entry_fee, now)
                .await;
        }

        for tournament in self.list().await {
            match tournament.status {
                TournamentStatus::Scheduled if now >= tournament.start_time => {
                    self.start(&tournament.id, now).await;
                }
                TournamentStatus::Running if now >= tournament.end_time => {
                    self.finish(&tournament.id, now).await;
                }
                _ => {}
            }
        }
    }
}
