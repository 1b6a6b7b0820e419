//! Pure bracket rules: pairing, match scoring and prize split.

use rand::Rng;

use crate::combat::match_score;
use crate::player::PlayerRecord;

pub const WINNER_SHARE_PERCENT: u64 = 70;
pub const RUNNER_UP_SHARE_PERCENT: u64 = 20;

/// Pair entrants in order. An odd entrant out is dropped, not given a bye.
pub fn pair_entrants(entrants: &[String]) -> Vec<(String, String)> {
    entrants
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// (winner prize, runner-up prize). The remaining tenth stays with the house.
pub fn prize_split(pool: u64) -> (u64, u64) {
    (
        pool * WINNER_SHARE_PERCENT / 100,
        pool * RUNNER_UP_SHARE_PERCENT / 100,
    )
}

/// Higher score wins; an exact tie is a coin flip.
pub fn decide_match<R: Rng + ?Sized>(
    player1: &PlayerRecord,
    player2: &PlayerRecord,
    rng: &mut R,
) -> String {
    let p1_score = match_score(player1.level, &player1.stats, rng);
    let p2_score = match_score(player2.level, &player2.stats, rng);
    let first_wins = match p1_score.cmp(&p2_score) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rng.gen_bool(0.5),
    };
    if first_wins {
        player1.id.clone()
    } else {
        player2.id.clone()
    }
}
