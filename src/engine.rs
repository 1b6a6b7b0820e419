//! The `GameEngine` wires the repositories together and exposes the public
//! operations the HTTP layer forwards to.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::battle::{BattleHandle, BattleManager, BattleRecord};
use crate::combat::{AiPool, Difficulty, SharedRng};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::matchmaking::{MatchmakingQueue, Pairing, QueueTicket};
use crate::player::{PlayerRecord, PlayerRegistry};
use crate::tournament::{Tournament, TournamentManager};

#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: EngineConfig,
    pub players: Arc<PlayerRegistry>,
    pub ai_pool: Arc<AiPool>,
    pub queue: Arc<MatchmakingQueue>,
    pub battles: Arc<BattleManager>,
    pub tournaments: Arc<TournamentManager>,
    rng: SharedRng,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = SharedRng::new(config.seed);
        let ai_pool = rng.with(|r| AiPool::generate(config.ai_pool_size, r));
        GameEngine::with_ai_pool(config, ai_pool, rng)
    }

    /// Build an engine around a caller-supplied AI pool and random source.
    pub fn with_ai_pool(config: EngineConfig, ai_pool: AiPool, rng: SharedRng) -> Self {
        let players = Arc::new(PlayerRegistry::new());
        let battles = Arc::new(BattleManager::new(
            Arc::clone(&players),
            rng.clone(),
            config.clone(),
        ));
        let tournaments = Arc::new(TournamentManager::new(
            Arc::clone(&players),
            Arc::clone(&battles),
            rng.clone(),
            config.clone(),
        ));
        info!("Game engine ready with {} AI opponents", ai_pool.len());
        GameEngine {
            config,
            players,
            ai_pool: Arc::new(ai_pool),
            queue: Arc::new(MatchmakingQueue::new()),
            battles,
            tournaments,
            rng,
        }
    }

    /// Put the player in the matchmaking queue (once) and report their position.
    pub async fn submit_for_battle(&self, player_id: &str) -> QueueTicket {
        self.players.get_or_create(player_id).await;
        let queue_position = self.queue.enqueue(player_id).await;
        QueueTicket {
            status: "queued".to_string(),
            message: "Looking for opponent...".to_string(),
            queue_position,
        }
    }

    pub async fn get_battle_status(&self, battle_id: &str) -> Result<BattleRecord> {
        self.battles.get(battle_id).await
    }

    pub async fn get_player_active_battle(&self, player_id: &str) -> Option<BattleRecord> {
        self.battles.active_battle_for(player_id).await
    }

    pub async fn get_player(&self, player_id: &str) -> PlayerRecord {
        self.players.get_or_create(player_id).await
    }

    pub async fn upgrade_stat(&self, player_id: &str, stat_name: &str) -> Result<PlayerRecord> {
        self.players.upgrade_stat(player_id, stat_name).await
    }

    pub async fn join_tournament(&self, player_id: &str, tournament_id: &str) -> Result<()> {
        self.tournaments.join(player_id, tournament_id).await
    }

    pub async fn create_tournament(
        &self,
        name: &str,
        difficulty: Difficulty,
        entry_fee: u64,
    ) -> Tournament {
        self.tournaments
            .create(name, difficulty, entry_fee, Utc::now())
            .await
    }

    pub async fn list_tournaments(&self) -> Vec<Tournament> {
        self.tournaments.list().await
    }

    /// One matchmaking pass: at most one pairing, PvP preferred over PvE.
    pub async fn matchmaking_pass(&self) -> Option<BattleHandle> {
        match self.queue.next_pairing(!self.ai_pool.is_empty()).await? {
            Pairing::PlayerVsPlayer(first, second) => {
                Some(self.battles.start_pvp(&first, &second).await)
            }
            Pairing::PlayerVsAi(player_id) => {
                let Some(ai) = self.rng.with(|r| self.ai_pool.choose(r).cloned()) else {
                    debug!("No AI opponent for {}", player_id);
                    return None;
                };
                Some(self.battles.start_pve(&player_id, &ai).await)
            }
        }
    }

    pub async fn scheduler_pass(&self, now: DateTime<Utc>) {
        self.tournaments.tick(now).await;
    }
}
