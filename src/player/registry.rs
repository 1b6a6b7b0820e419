use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rocket::futures::lock::Mutex;

use super::{OutcomeTag, PlayerRecord, RewardReceipt};
use crate::error::Result;

/// Owns every player record for the lifetime of the process.
///
/// The outer map lock is only held long enough to find or insert an entry; all
/// mutation happens under the per-player lock so concurrent settlements on the
/// same player never lose an update.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Mutex<HashMap<String, Arc<Mutex<PlayerRecord>>>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        PlayerRegistry::default()
    }

    async fn entry(&self, player_id: &str) -> Arc<Mutex<PlayerRecord>> {
        let mut players = self.players.lock().await;
        Arc::clone(players.entry(player_id.to_string()).or_insert_with(|| {
            debug!("Creating player record for {}", player_id);
            Arc::new(Mutex::new(PlayerRecord::new(player_id)))
        }))
    }

    /// Snapshot of the player's record, creating it with defaults on first reference.
    pub async fn get_or_create(&self, player_id: &str) -> PlayerRecord {
        let entry = self.entry(player_id).await;
        let record = entry.lock().await;
        record.clone()
    }

    pub async fn contains(&self, player_id: &str) -> bool {
        self.players.lock().await.contains_key(player_id)
    }

    pub async fn apply_reward(
        &self,
        player_id: &str,
        xp: u64,
        credits: u64,
        outcome: OutcomeTag,
    ) -> RewardReceipt {
        let entry = self.entry(player_id).await;
        let mut record = entry.lock().await;
        let receipt = record.apply_reward(xp, credits, outcome);
        if receipt.levels_gained > 0 {
            info!(
                "{} reached level {} ({} skill points)",
                record.name, record.level, record.skill_points
            );
        }
        receipt
    }

    /// Debit `amount` credits, failing without side effects when the balance is short.
    pub async fn try_debit(&self, player_id: &str, amount: u64) -> Result<u64> {
        let entry = self.entry(player_id).await;
        let mut record = entry.lock().await;
        record.try_debit(amount)
    }

    pub async fn credit(&self, player_id: &str, amount: u64) -> u64 {
        let entry = self.entry(player_id).await;
        let mut record = entry.lock().await;
        record.credit(amount)
    }

    pub async fn upgrade_stat(&self, player_id: &str, stat_name: &str) -> Result<PlayerRecord> {
        let entry = self.entry(player_id).await;
        let mut record = entry.lock().await;
        let stat = record.upgrade_stat(stat_name)?;
        info!("{} upgraded {}", record.name, stat);
        Ok(record.clone())
    }

    pub async fn touch_last_battle(&self, player_id: &str, at: DateTime<Utc>) {
        let entry = self.entry(player_id).await;
        entry.lock().await.last_battle = Some(at);
    }
}
