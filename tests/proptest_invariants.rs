// Property-based tests for the damage floor, reward bookkeeping and debits
use arena_engine::battle::{BattleSimulation, Fighter, Winner};
use arena_engine::combat::{calculate_damage, seeded_rng};
use arena_engine::player::{
    xp_for_level, CombatStats, OutcomeTag, PlayerRecord, STARTING_CREDITS,
};
use arena_engine::tournament::bracket::prize_split;
use proptest::prelude::*;

fn outcome_strategy() -> impl Strategy<Value = OutcomeTag> {
    prop::sample::select(vec![
        OutcomeTag::Win,
        OutcomeTag::Loss,
        OutcomeTag::Draw,
        OutcomeTag::PveWin,
        OutcomeTag::PveLoss,
    ])
}

fn banked_xp(record: &PlayerRecord) -> u64 {
    (1..record.level).map(xp_for_level).sum::<u64>() + record.xp
}

proptest! {
    #[test]
    fn proptest_damage_is_never_below_one(
        seed in any::<u64>(),
        damage in any::<u32>(),
        armor in any::<u32>(),
        health in 1u32..1000,
    ) {
        let mut rng = seeded_rng(seed);
        let attacker = CombatStats { health, damage, armor: 0, speed: 5 };
        let defender = CombatStats { health, damage: 0, armor, speed: 5 };
        let d = calculate_damage(&attacker, &defender, &mut rng);
        prop_assert!(d >= 1);
    }

    #[test]
    fn proptest_rewards_are_monotonic_with_exact_carry_over(
        seq in prop::collection::vec((0u64..5000, 0u64..500, outcome_strategy()), 0..40)
    ) {
        let mut record = PlayerRecord::new("prop");
        let mut granted_xp = 0u64;
        for (i, (xp, credits, outcome)) in seq.iter().enumerate() {
            let before_credits = record.credits;
            let before_level = record.level;
            let before_points = record.skill_points;
            let receipt = record.apply_reward(*xp, *credits, *outcome);
            granted_xp += xp;

            prop_assert!(record.credits >= before_credits);
            prop_assert_eq!(record.credits, before_credits + credits);
            prop_assert!(record.xp < xp_for_level(record.level));
            prop_assert_eq!(record.level, before_level + receipt.levels_gained);
            prop_assert_eq!(record.skill_points, before_points + receipt.levels_gained);
            prop_assert_eq!(banked_xp(&record), granted_xp);
            prop_assert_eq!(record.battles_recorded() as usize, i + 1);
        }
    }

    #[test]
    fn proptest_debits_never_overdraw(
        amounts in prop::collection::vec(0u64..200, 0..30)
    ) {
        let mut record = PlayerRecord::new("spender");
        let mut spent = 0u64;
        for amount in amounts {
            let before = record.credits;
            match record.try_debit(amount) {
                Ok(balance) => {
                    spent += amount;
                    prop_assert_eq!(balance, before - amount);
                }
                Err(_) => {
                    prop_assert!(amount > before);
                    prop_assert_eq!(record.credits, before);
                }
            }
        }
        prop_assert!(spent <= STARTING_CREDITS);
        prop_assert_eq!(record.credits, STARTING_CREDITS - spent);
    }

    #[test]
    fn proptest_turn_cap_with_equal_health_is_a_draw(
        seed in any::<u64>(),
        health in 50u32..500,
        max_turns in 1u32..30,
    ) {
        // Armor far above damage pins every hit to exactly 1.
        let stats = CombatStats { health, damage: 1, armor: 1000, speed: 5 };
        let first = Fighter { id: "a".into(), name: "A".into(), stats };
        let second = Fighter { id: "b".into(), name: "B".into(), stats };
        let mut sim = BattleSimulation::new(first, second, max_turns);
        let winner = sim.run_to_end(&mut seeded_rng(seed));
        prop_assert_eq!(winner, Winner::Draw);
        prop_assert_eq!(sim.health(), (health - max_turns, health - max_turns));
    }

    #[test]
    fn proptest_prize_split_never_exceeds_pool(pool in 0u64..10_000_000) {
        let (winner, runner_up) = prize_split(pool);
        prop_assert_eq!(winner, pool * 70 / 100);
        prop_assert_eq!(runner_up, pool * 20 / 100);
        prop_assert!(winner + runner_up <= pool);
    }
}
