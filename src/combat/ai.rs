use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::player::CombatStats;

pub const AI_ID_PREFIX: &str = "ai_";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Elite,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Elite,
    ];

    /// PvE reward multiplier expressed in percent (easy 0.8 ... elite 1.8).
    pub fn reward_percent(self) -> u64 {
        match self {
            Difficulty::Easy => 80,
            Difficulty::Medium => 100,
            Difficulty::Hard => 130,
            Difficulty::Elite => 180,
        }
    }

    /// Apply the tier adjustments on top of rolled base stats.
    pub fn adjust(self, mut stats: CombatStats) -> CombatStats {
        match self {
            Difficulty::Easy => {
                stats.health = 80;
                stats.damage = stats.damage.saturating_sub(5).max(10);
            }
            Difficulty::Medium => {}
            Difficulty::Hard => {
                stats.health = 120;
                stats.damage += 5;
            }
            Difficulty::Elite => {
                stats.health = 150;
                stats.damage += 10;
                stats.armor += 5;
            }
        }
        stats
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Elite => "Elite",
        };
        write!(f, "{}", name)
    }
}

/// A computer-controlled opponent. Never rewarded, never persisted.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct AiOpponent {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub level: u32,
    pub stats: CombatStats,
}

/// Fixed pool of opponents generated once at startup.
#[derive(Clone, Debug, Default)]
pub struct AiPool {
    opponents: Vec<AiOpponent>,
}

impl AiPool {
    pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let opponents = (1..=size)
            .map(|n| {
                let difficulty = Difficulty::ALL[rng.gen_range(0..Difficulty::ALL.len())];
                let base = CombatStats {
                    health: 100,
                    damage: rng.gen_range(10..=30),
                    armor: rng.gen_range(5..=20),
                    speed: rng.gen_range(1..=10),
                };
                AiOpponent {
                    id: format!("{}{}", AI_ID_PREFIX, n),
                    name: format!("{} Mech #{}", difficulty, n),
                    difficulty,
                    level: rng.gen_range(1..=50),
                    stats: difficulty.adjust(base),
                }
            })
            .collect();
        AiPool { opponents }
    }

    pub fn from_opponents(opponents: Vec<AiOpponent>) -> Self {
        AiPool { opponents }
    }

    pub fn is_empty(&self) -> bool {
        self.opponents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.opponents.len()
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&AiOpponent> {
        self.opponents.choose(rng)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AiOpponent> {
        self.opponents.iter()
    }
}
