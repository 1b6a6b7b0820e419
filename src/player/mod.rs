//! Player progression state: level, experience, credits and combat stats.
//!
//! A [`PlayerRecord`] is only ever mutated through the [`registry::PlayerRegistry`],
//! which serializes access per player id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::{EngineError, Result};

pub mod endpoints;
pub mod registry;

pub use registry::PlayerRegistry;

pub const STARTING_CREDITS: u64 = 100;

/// Experience required to advance past `level`.
pub fn xp_for_level(level: u32) -> u64 {
    let level = u64::from(level);
    100 * level * level + 500
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct CombatStats {
    pub health: u32,
    pub damage: u32,
    pub armor: u32,
    pub speed: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        CombatStats {
            health: 100,
            damage: 15,
            armor: 10,
            speed: 5,
        }
    }
}

/// The four stats a skill point can be spent on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum StatKind {
    Health,
    Damage,
    Armor,
    Speed,
}

impl StatKind {
    /// Amount a single skill point adds to this stat.
    pub fn upgrade_amount(self) -> u32 {
        match self {
            StatKind::Health => 5,
            _ => 1,
        }
    }
}

impl FromStr for StatKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "health" => Ok(StatKind::Health),
            "damage" => Ok(StatKind::Damage),
            "armor" => Ok(StatKind::Armor),
            "speed" => Ok(StatKind::Speed),
            other => Err(EngineError::InvalidStat(other.to_string())),
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatKind::Health => "Health",
            StatKind::Damage => "Damage",
            StatKind::Armor => "Armor",
            StatKind::Speed => "Speed",
        };
        write!(f, "{}", name)
    }
}

/// Which outcome counter a reward increments.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum OutcomeTag {
    Win,
    Loss,
    Draw,
    PveWin,
    PveLoss,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct BattlePass {
    pub active: bool,
    pub end_date: Option<DateTime<Utc>>,
    pub level: u32,
    pub xp: u64,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub credits: u64,
    pub stats: CombatStats,
    pub skill_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub pve_wins: u32,
    pub pve_losses: u32,
    pub last_battle: Option<DateTime<Utc>>,
    pub battle_pass: BattlePass,
}

/// What a single `apply_reward` call changed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RewardReceipt {
    pub levels_gained: u32,
    pub level: u32,
    pub xp: u64,
    pub credits: u64,
}

impl PlayerRecord {
    pub fn new(id: &str) -> Self {
        let short: String = id.chars().take(6).collect();
        PlayerRecord {
            id: id.to_string(),
            name: format!("Player_{}", short),
            level: 1,
            xp: 0,
            credits: STARTING_CREDITS,
            stats: CombatStats::default(),
            skill_points: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            pve_wins: 0,
            pve_losses: 0,
            last_battle: None,
            battle_pass: BattlePass {
                level: 1,
                ..BattlePass::default()
            },
        }
    }

    /// Total PvP and PvE outcomes recorded for this player.
    pub fn battles_recorded(&self) -> u32 {
        self.wins + self.losses + self.draws + self.pve_wins + self.pve_losses
    }

    /// Add experience and credits, bump the outcome counter, then level up as many
    /// times as the accumulated experience allows. Excess experience carries over.
    pub fn apply_reward(&mut self, xp: u64, credits: u64, outcome: OutcomeTag) -> RewardReceipt {
        self.xp = self.xp.saturating_add(xp);
        self.credits = self.credits.saturating_add(credits);
        match outcome {
            OutcomeTag::Win => self.wins += 1,
            OutcomeTag::Loss => self.losses += 1,
            OutcomeTag::Draw => self.draws += 1,
            OutcomeTag::PveWin => self.pve_wins += 1,
            OutcomeTag::PveLoss => self.pve_losses += 1,
        }

        let mut levels_gained = 0;
        loop {
            let needed = xp_for_level(self.level);
            if self.xp < needed {
                break;
            }
            self.xp -= needed;
            self.level += 1;
            self.skill_points += 1;
            levels_gained += 1;
        }

        RewardReceipt {
            levels_gained,
            level: self.level,
            xp: self.xp,
            credits: self.credits,
        }
    }

    pub fn try_debit(&mut self, amount: u64) -> Result<u64> {
        if self.credits < amount {
            return Err(EngineError::InsufficientFunds {
                balance: self.credits,
                required: amount,
            });
        }
        self.credits -= amount;
        Ok(self.credits)
    }

    pub fn credit(&mut self, amount: u64) -> u64 {
        self.credits = self.credits.saturating_add(amount);
        self.credits
    }

    /// Spend one skill point on the named stat.
    pub fn upgrade_stat(&mut self, stat_name: &str) -> Result<StatKind> {
        if self.skill_points < 1 {
            return Err(EngineError::NoSkillPoints);
        }
        let stat: StatKind = stat_name.parse()?;
        let amount = stat.upgrade_amount();
        let slot = match stat {
            StatKind::Health => &mut self.stats.health,
            StatKind::Damage => &mut self.stats.damage,
            StatKind::Armor => &mut self.stats.armor,
            StatKind::Speed => &mut self.stats.speed,
        };
        *slot += amount;
        self.skill_points -= 1;
        Ok(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_has_documented_defaults() {
        let p = PlayerRecord::new("abcdef123");
        assert_eq!(p.name, "Player_abcdef");
        assert_eq!(p.level, 1);
        assert_eq!(p.credits, 100);
        assert_eq!(p.stats, CombatStats::default());
        assert!(!p.battle_pass.active);
        assert_eq!(p.battles_recorded(), 0);
    }

    #[test]
    fn level_threshold_formula() {
        assert_eq!(xp_for_level(1), 600);
        assert_eq!(xp_for_level(2), 900);
        assert_eq!(xp_for_level(3), 1400);
    }

    #[test]
    fn level_up_carries_exact_excess() {
        let mut p = PlayerRecord::new("p1");
        p.xp = 580;
        let receipt = p.apply_reward(50, 25, OutcomeTag::Win);
        assert_eq!(receipt.levels_gained, 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 580 + 50 - 600);
        assert_eq!(p.skill_points, 1);
        assert_eq!(p.wins, 1);
        assert_eq!(p.credits, 125);
    }

    #[test]
    fn level_up_cascades() {
        let mut p = PlayerRecord::new("p1");
        // 600 for level 1, 900 for level 2, 100 left over.
        let receipt = p.apply_reward(1600, 0, OutcomeTag::PveWin);
        assert_eq!(receipt.levels_gained, 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 100);
        assert_eq!(p.skill_points, 2);
        assert_eq!(p.pve_wins, 1);
    }

    #[test]
    fn reward_never_decreases_credits_or_total_xp() {
        let mut p = PlayerRecord::new("p1");
        for (xp, credits) in [(0, 0), (10, 5), (599, 1), (1000, 0)] {
            let before_credits = p.credits;
            let before_level = p.level;
            let before_xp = p.xp;
            p.apply_reward(xp, credits, OutcomeTag::Draw);
            assert!(p.credits >= before_credits);
            assert!(p.level > before_level || p.xp >= before_xp);
        }
    }

    #[test]
    fn debit_rejects_overdraft_and_leaves_balance() {
        let mut p = PlayerRecord::new("p1");
        let err = p.try_debit(150).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientFunds {
                balance: 100,
                required: 150
            }
        );
        assert_eq!(p.credits, 100);
        assert_eq!(p.try_debit(100), Ok(0));
    }

    #[test]
    fn upgrade_requires_skill_point_then_valid_stat() {
        let mut p = PlayerRecord::new("p1");
        assert_eq!(p.upgrade_stat("health"), Err(EngineError::NoSkillPoints));

        p.skill_points = 2;
        assert_eq!(
            p.upgrade_stat("luck"),
            Err(EngineError::InvalidStat("luck".to_string()))
        );
        assert_eq!(p.skill_points, 2);

        assert_eq!(p.upgrade_stat("health"), Ok(StatKind::Health));
        assert_eq!(p.stats.health, 105);
        assert_eq!(p.upgrade_stat("armor"), Ok(StatKind::Armor));
        assert_eq!(p.stats.armor, 11);
        assert_eq!(p.skill_points, 0);
    }
}
