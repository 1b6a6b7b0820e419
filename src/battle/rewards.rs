//! Reward table applied when a battle concludes.

use super::{BattleKind, Winner};
use crate::combat::Difficulty;
use crate::player::OutcomeTag;

pub const PVP_WIN: (u64, u64) = (50, 25);
pub const PVP_LOSS: (u64, u64) = (20, 10);
pub const PVP_DRAW: (u64, u64) = (40, 20);
pub const PVE_WIN_BASE: (u64, u64) = (50, 25);
pub const PVE_LOSS: (u64, u64) = (10, 5);

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RewardGrant {
    pub player_id: String,
    pub xp: u64,
    pub credits: u64,
    pub outcome: OutcomeTag,
}

fn grant(player_id: &str, (xp, credits): (u64, u64), outcome: OutcomeTag) -> RewardGrant {
    RewardGrant {
        player_id: player_id.to_string(),
        xp,
        credits,
        outcome,
    }
}

/// Grants owed for a finished battle. `player1` is always a human; in PvE battles
/// `player2` is the AI and receives nothing. Tournament matches pay out through
/// the prize pool instead. A PvE draw counts as a loss for the human.
pub fn settlement(
    kind: BattleKind,
    player1: &str,
    player2: &str,
    winner: &Winner,
    ai_difficulty: Option<Difficulty>,
) -> Vec<RewardGrant> {
    match kind {
        BattleKind::Pvp => match winner.participant() {
            Some(winner_id) => {
                let loser_id = if winner_id == player1 { player2 } else { player1 };
                vec![
                    grant(winner_id, PVP_WIN, OutcomeTag::Win),
                    grant(loser_id, PVP_LOSS, OutcomeTag::Loss),
                ]
            }
            None => vec![
                grant(player1, PVP_DRAW, OutcomeTag::Draw),
                grant(player2, PVP_DRAW, OutcomeTag::Draw),
            ],
        },
        BattleKind::Pve => {
            if winner.participant() == Some(player1) {
                let percent = ai_difficulty.unwrap_or(Difficulty::Medium).reward_percent();
                let (xp, credits) = PVE_WIN_BASE;
                vec![grant(
                    player1,
                    (xp * percent / 100, credits * percent / 100),
                    OutcomeTag::PveWin,
                )]
            } else {
                vec![grant(player1, PVE_LOSS, OutcomeTag::PveLoss)]
            }
        }
        BattleKind::Tournament => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn won_by(id: &str) -> Winner {
        Winner::Participant(id.to_string())
    }

    #[test]
    fn pvp_win_and_loss() {
        let grants = settlement(BattleKind::Pvp, "a", "b", &won_by("b"), None);
        assert_eq!(
            grants,
            vec![
                grant("b", (50, 25), OutcomeTag::Win),
                grant("a", (20, 10), OutcomeTag::Loss),
            ]
        );
    }

    #[test]
    fn pvp_draw_rewards_both() {
        let grants = settlement(BattleKind::Pvp, "a", "b", &Winner::Draw, None);
        assert_eq!(grants.len(), 2);
        assert!(grants
            .iter()
            .all(|g| g.xp == 40 && g.credits == 20 && g.outcome == OutcomeTag::Draw));
    }

    #[test]
    fn pve_win_scales_with_difficulty() {
        let expected = [
            (Difficulty::Easy, 40, 20),
            (Difficulty::Medium, 50, 25),
            (Difficulty::Hard, 65, 32),
            (Difficulty::Elite, 90, 45),
        ];
        for (difficulty, xp, credits) in expected {
            let grants = settlement(BattleKind::Pve, "a", "ai_3", &won_by("a"), Some(difficulty));
            assert_eq!(grants, vec![grant("a", (xp, credits), OutcomeTag::PveWin)]);
        }
    }

    #[test]
    fn pve_loss_and_draw_are_flat_and_ai_gets_nothing() {
        for winner in [won_by("ai_3"), Winner::Draw] {
            let grants = settlement(
                BattleKind::Pve,
                "a",
                "ai_3",
                &winner,
                Some(Difficulty::Elite),
            );
            assert_eq!(grants, vec![grant("a", (10, 5), OutcomeTag::PveLoss)]);
        }
    }

    #[test]
    fn tournament_matches_pay_nothing_here() {
        assert!(settlement(BattleKind::Tournament, "a", "b", &won_by("a"), None).is_empty());
    }
}
