//! Damage resolution and the engine's shared random source.
//!
//! Everything here is pure over its inputs; randomness is passed in as
//! `&mut impl Rng` so callers can hand in a seeded generator for reproducible
//! fights.

use std::sync::{Arc, Mutex};

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Lcg64Xsh32;

use crate::player::CombatStats;

pub mod ai;

pub use ai::{AiOpponent, AiPool, Difficulty};

pub const DAMAGE_VARIATION: i64 = 5;
pub const SCORE_VARIATION: i64 = 10;

/// Build the engine RNG from a u64 seed (two little-endian copies fill the 16-byte seed).
pub fn seeded_rng(seed: u64) -> Lcg64Xsh32 {
    let mut seed_bytes = [0u8; 16];
    seed_bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    seed_bytes[8..16].copy_from_slice(&seed.to_le_bytes());
    Lcg64Xsh32::from_seed(seed_bytes)
}

/// `max(1, damage + uniform(-5, 5) - armor)`.
pub fn calculate_damage<R: Rng + ?Sized>(
    attacker: &CombatStats,
    defender: &CombatStats,
    rng: &mut R,
) -> u32 {
    let variation = rng.gen_range(-DAMAGE_VARIATION..=DAMAGE_VARIATION);
    let raw = i64::from(attacker.damage) + variation - i64::from(defender.armor);
    u32::try_from(raw.max(1)).unwrap_or(u32::MAX)
}

/// Tournament match strength: `level * 10 + damage + armor + uniform(-10, 10)`.
pub fn match_score<R: Rng + ?Sized>(level: u32, stats: &CombatStats, rng: &mut R) -> i64 {
    i64::from(level) * 10
        + i64::from(stats.damage)
        + i64::from(stats.armor)
        + rng.gen_range(-SCORE_VARIATION..=SCORE_VARIATION)
}

/// Generator shared between the background loops and every battle task.
///
/// The lock is never held across an await point.
#[derive(Clone, Debug)]
pub struct SharedRng {
    inner: Arc<Mutex<Lcg64Xsh32>>,
}

impl SharedRng {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        SharedRng {
            inner: Arc::new(Mutex::new(seeded_rng(seed))),
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut Lcg64Xsh32) -> T) -> T {
        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(damage: u32, armor: u32) -> CombatStats {
        CombatStats {
            health: 100,
            damage,
            armor,
            speed: 5,
        }
    }

    #[test]
    fn damage_is_at_least_one_against_huge_armor() {
        let mut rng = seeded_rng(1);
        for armor in [0, 10, 25, 1_000, u32::MAX] {
            for _ in 0..200 {
                let d = calculate_damage(&stats(15, 0), &stats(1, armor), &mut rng);
                assert!(d >= 1, "armor {} produced {}", armor, d);
            }
        }
    }

    #[test]
    fn huge_damage_saturates_instead_of_wrapping() {
        let mut rng = seeded_rng(4);
        for _ in 0..50 {
            let d = calculate_damage(&stats(u32::MAX, 0), &stats(1, 0), &mut rng);
            assert!(d >= u32::MAX - 5);
        }
    }

    #[test]
    fn damage_stays_within_variation_band() {
        let mut rng = seeded_rng(2);
        for _ in 0..500 {
            let d = calculate_damage(&stats(30, 10), &stats(1, 10), &mut rng);
            assert!((15..=25).contains(&d));
        }
    }

    #[test]
    fn same_seed_same_damage_sequence() {
        let mut a = seeded_rng(99);
        let mut b = seeded_rng(99);
        let seq_a: Vec<u32> = (0..20)
            .map(|_| calculate_damage(&stats(15, 10), &stats(15, 10), &mut a))
            .collect();
        let seq_b: Vec<u32> = (0..20)
            .map(|_| calculate_damage(&stats(15, 10), &stats(15, 10), &mut b))
            .collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn score_band() {
        let mut rng = seeded_rng(3);
        for _ in 0..500 {
            let s = match_score(2, &stats(15, 10), &mut rng);
            assert!((35..=55).contains(&s));
        }
    }

    #[test]
    fn shared_rng_is_reproducible_with_seed() {
        let a = SharedRng::new(Some(5));
        let b = SharedRng::new(Some(5));
        assert_eq!(a.with(|r| r.next_u64()), b.with(|r| r.next_u64()));
    }
}
