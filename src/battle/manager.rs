use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rocket::futures::lock::Mutex;
use rocket::tokio;
use rocket::tokio::task::JoinHandle;

use super::rewards::settlement;
use super::simulation::{BattleSimulation, Fighter};
use super::{BattleKind, BattleRecord, Participant, Winner};
use crate::combat::{AiOpponent, SharedRng};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::player::{PlayerRecord, PlayerRegistry};

/// A battle running in the background. The caller may await it or simply poll
/// the manager by id.
#[derive(Debug)]
pub struct BattleHandle {
    pub battle_id: String,
    task: JoinHandle<BattleRecord>,
}

impl BattleHandle {
    /// Wait for the simulation to finish and return the concluded record.
    pub async fn finished(self) -> Option<BattleRecord> {
        self.task.await.ok()
    }
}

/// Owns the set of active and recently completed battles.
#[derive(Debug)]
pub struct BattleManager {
    battles: Mutex<HashMap<String, Arc<Mutex<BattleRecord>>>>,
    next_id: AtomicU64,
    players: Arc<PlayerRegistry>,
    rng: SharedRng,
    config: EngineConfig,
}

fn participant(record: &PlayerRecord) -> Participant {
    Participant {
        id: record.id.clone(),
        name: record.name.clone(),
        is_ai: false,
    }
}

fn fighter(record: &PlayerRecord) -> Fighter {
    Fighter {
        id: record.id.clone(),
        name: record.name.clone(),
        stats: record.stats,
    }
}

impl BattleManager {
    pub fn new(players: Arc<PlayerRegistry>, rng: SharedRng, config: EngineConfig) -> Self {
        BattleManager {
            battles: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            players,
            rng,
            config,
        }
    }

    fn next_battle_id(&self) -> String {
        format!("battle_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn insert(&self, record: BattleRecord) -> Arc<Mutex<BattleRecord>> {
        let slot = Arc::new(Mutex::new(record));
        let id = slot.lock().await.id.clone();
        self.battles.lock().await.insert(id, Arc::clone(&slot));
        slot
    }

    pub async fn start_pvp(self: &Arc<Self>, player1_id: &str, player2_id: &str) -> BattleHandle {
        let p1 = self.players.get_or_create(player1_id).await;
        let p2 = self.players.get_or_create(player2_id).await;

        let mut record = BattleRecord::new(
            self.next_battle_id(),
            participant(&p1),
            participant(&p2),
            BattleKind::Pvp,
        );
        record.log_event("Battle started!");
        record.log_event(format!("{} vs {}", p1.name, p2.name));

        let sim = BattleSimulation::new(fighter(&p1), fighter(&p2), self.config.max_turns);
        self.launch(record, sim).await
    }

    pub async fn start_pve(self: &Arc<Self>, player_id: &str, ai: &AiOpponent) -> BattleHandle {
        let player = self.players.get_or_create(player_id).await;

        let mut record = BattleRecord::new(
            self.next_battle_id(),
            participant(&player),
            Participant {
                id: ai.id.clone(),
                name: ai.name.clone(),
                is_ai: true,
            },
            BattleKind::Pve,
        );
        record.ai_difficulty = Some(ai.difficulty);
        record.log_event("Battle started!");
        record.log_event(format!("{} vs {}", player.name, ai.name));

        let opponent = Fighter {
            id: ai.id.clone(),
            name: ai.name.clone(),
            stats: ai.stats,
        };
        let sim = BattleSimulation::new(fighter(&player), opponent, self.config.max_turns);
        self.launch(record, sim).await
    }

    async fn launch(self: &Arc<Self>, record: BattleRecord, sim: BattleSimulation) -> BattleHandle {
        let battle_id = record.id.clone();
        info!(
            "Starting {:?} battle {}: {} vs {}",
            record.kind, battle_id, record.player1.id, record.player2.id
        );
        let slot = self.insert(record).await;
        let manager = Arc::clone(self);
        let task = tokio::spawn(async move { manager.run(slot, sim).await });
        BattleHandle { battle_id, task }
    }

    async fn run(
        self: Arc<Self>,
        slot: Arc<Mutex<BattleRecord>>,
        mut sim: BattleSimulation,
    ) -> BattleRecord {
        let pacing = self.config.turn_pacing();
        let winner = loop {
            let report = self.rng.with(|rng| sim.play_turn(rng));
            {
                let mut record = slot.lock().await;
                for strike in &report.strikes {
                    let message = format!(
                        "Turn {}: {} hits {} for {} damage!",
                        report.turn,
                        record.name_of(&strike.attacker),
                        record.name_of(&strike.defender),
                        strike.damage
                    );
                    record.log_event(message);
                }
            }
            if let Some(winner) = report.outcome {
                break winner;
            }
            tokio::time::sleep(pacing).await;
        };

        let snapshot = {
            let mut record = slot.lock().await;
            record.conclude(winner.clone());
            let message = match &winner {
                Winner::Draw => "Battle ended in a draw!".to_string(),
                Winner::Participant(id) => format!("{} wins the battle!", record.name_of(id)),
            };
            record.log_event(message);
            record.clone()
        };
        info!("Battle {} concluded: {:?}", snapshot.id, winner);

        self.settle(&snapshot).await;
        self.schedule_eviction(snapshot.id.clone(), self.config.battle_grace());
        snapshot
    }

    async fn settle(&self, record: &BattleRecord) {
        let Some(winner) = &record.winner else {
            return;
        };
        let grants = settlement(
            record.kind,
            &record.player1.id,
            &record.player2.id,
            winner,
            record.ai_difficulty,
        );
        for grant in grants {
            self.players
                .apply_reward(&grant.player_id, grant.xp, grant.credits, grant.outcome)
                .await;
        }
        if let Some(end) = record.end_time {
            for p in [&record.player1, &record.player2] {
                if !p.is_ai {
                    self.players.touch_last_battle(&p.id, end).await;
                }
            }
        }
    }

    fn schedule_eviction(self: &Arc<Self>, battle_id: String, grace: Duration) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if manager.battles.lock().await.remove(&battle_id).is_some() {
                debug!("Evicted battle {}", battle_id);
            }
        });
    }

    /// Record an already-decided tournament match so it can be polled like any
    /// other battle until its grace period lapses.
    pub async fn record_tournament_match(
        self: &Arc<Self>,
        tournament_id: &str,
        match_id: &str,
        player1: &PlayerRecord,
        player2: &PlayerRecord,
        winner_id: &str,
    ) -> BattleRecord {
        let mut record = BattleRecord::new(
            self.next_battle_id(),
            participant(player1),
            participant(player2),
            BattleKind::Tournament,
        );
        record.tournament_id = Some(tournament_id.to_string());
        record.match_id = Some(match_id.to_string());
        record.conclude(Winner::Participant(winner_id.to_string()));
        let message = format!("{} wins the tournament match!", record.name_of(winner_id));
        record.log_event(message);

        let snapshot = record.clone();
        self.insert(record).await;
        self.schedule_eviction(snapshot.id.clone(), self.config.tournament_match_grace());
        snapshot
    }

    pub async fn get(&self, battle_id: &str) -> Result<BattleRecord> {
        let slot = self
            .battles
            .lock()
            .await
            .get(battle_id)
            .cloned()
            .ok_or_else(|| EngineError::BattleNotFound(battle_id.to_string()))?;
        let record = slot.lock().await;
        Ok(record.clone())
    }

    /// The earliest-started active battle the player takes part in.
    pub async fn active_battle_for(&self, player_id: &str) -> Option<BattleRecord> {
        let slots: Vec<Arc<Mutex<BattleRecord>>> =
            self.battles.lock().await.values().cloned().collect();
        let mut found: Option<BattleRecord> = None;
        for slot in slots {
            let record = slot.lock().await;
            if !record.is_active() || !record.involves(player_id) {
                continue;
            }
            let earlier = found
                .as_ref()
                .map_or(true, |f| record.start_time < f.start_time);
            if earlier {
                found = Some(record.clone());
            }
        }
        found
    }

    pub async fn tracked(&self) -> usize {
        self.battles.lock().await.len()
    }
}
