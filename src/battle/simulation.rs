//! Turn-by-turn combat between two stat snapshots.
//!
//! One turn is participant 1 striking, then participant 2 striking back. The
//! fight ends as soon as either side reaches zero health, or once `max_turns`
//! full turns have been played, in which case the side with more remaining
//! health wins and equal health is a draw. Stored player stats are never touched.

use rand::Rng;

use super::Winner;
use crate::combat::calculate_damage;
use crate::player::CombatStats;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fighter {
    pub id: String,
    pub name: String,
    pub stats: CombatStats,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Strike {
    pub attacker: String,
    pub defender: String,
    pub damage: u32,
    pub defender_health: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TurnReport {
    pub turn: u32,
    pub strikes: Vec<Strike>,
    pub outcome: Option<Winner>,
}

#[derive(Clone, Debug)]
pub struct BattleSimulation {
    fighters: [Fighter; 2],
    health: [u32; 2],
    turn: u32,
    max_turns: u32,
    outcome: Option<Winner>,
}

impl BattleSimulation {
    pub fn new(first: Fighter, second: Fighter, max_turns: u32) -> Self {
        let health = [first.stats.health, second.stats.health];
        BattleSimulation {
            fighters: [first, second],
            health,
            turn: 1,
            max_turns,
            outcome: None,
        }
    }

    pub fn health(&self) -> (u32, u32) {
        (self.health[0], self.health[1])
    }

    pub fn outcome(&self) -> Option<&Winner> {
        self.outcome.as_ref()
    }

    pub fn turns_played(&self) -> u32 {
        self.turn - 1
    }

    fn decide_on_health(&self) -> Winner {
        match self.health[0].cmp(&self.health[1]) {
            std::cmp::Ordering::Greater => Winner::Participant(self.fighters[0].id.clone()),
            std::cmp::Ordering::Less => Winner::Participant(self.fighters[1].id.clone()),
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }

    fn finish(&mut self, winner: Winner) -> Option<Winner> {
        self.outcome = Some(winner);
        self.outcome.clone()
    }

    /// Play one full turn. Once the fight is decided every further call returns the
    /// same outcome with no strikes.
    pub fn play_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TurnReport {
        let turn = self.turn;
        if self.outcome.is_some() {
            return TurnReport {
                turn,
                strikes: Vec::new(),
                outcome: self.outcome.clone(),
            };
        }
        if turn > self.max_turns || self.health.contains(&0) {
            let winner = self.decide_on_health();
            return TurnReport {
                turn,
                strikes: Vec::new(),
                outcome: self.finish(winner),
            };
        }

        let mut strikes = Vec::with_capacity(2);
        for (attacker, defender) in [(0usize, 1usize), (1, 0)] {
            let damage = calculate_damage(
                &self.fighters[attacker].stats,
                &self.fighters[defender].stats,
                rng,
            );
            self.health[defender] = self.health[defender].saturating_sub(damage);
            strikes.push(Strike {
                attacker: self.fighters[attacker].id.clone(),
                defender: self.fighters[defender].id.clone(),
                damage,
                defender_health: self.health[defender],
            });
            if self.health[defender] == 0 {
                let winner = Winner::Participant(self.fighters[attacker].id.clone());
                return TurnReport {
                    turn,
                    strikes,
                    outcome: self.finish(winner),
                };
            }
        }

        self.turn += 1;
        let outcome = if self.turn > self.max_turns {
            let winner = self.decide_on_health();
            self.finish(winner)
        } else {
            None
        };
        TurnReport {
            turn,
            strikes,
            outcome,
        }
    }

    /// Play turns without pacing until the fight is decided.
    pub fn run_to_end<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Winner {
        loop {
            if let Some(winner) = self.play_turn(rng).outcome {
                return winner;
            }
        }
    }
}
