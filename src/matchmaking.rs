//! Waiting line for players who asked for a battle.

use std::collections::VecDeque;

use rocket::futures::lock::Mutex;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

/// What one pairing pass decided.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Pairing {
    PlayerVsPlayer(String, String),
    /// Caller picks the AI opponent.
    PlayerVsAi(String),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct QueueTicket {
    pub status: String,
    pub message: String,
    pub queue_position: usize,
}

#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    waiting: Mutex<VecDeque<String>>,
}

impl MatchmakingQueue {
    pub fn new() -> Self {
        MatchmakingQueue::default()
    }

    /// Queue the player unless already waiting; returns the 1-based position.
    pub async fn enqueue(&self, player_id: &str) -> usize {
        let mut waiting = self.waiting.lock().await;
        match waiting.iter().position(|id| id == player_id) {
            Some(idx) => idx + 1,
            None => {
                waiting.push_back(player_id.to_string());
                waiting.len()
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.waiting.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.waiting.lock().await.is_empty()
    }

    pub async fn contains(&self, player_id: &str) -> bool {
        self.waiting.lock().await.iter().any(|id| id == player_id)
    }

    /// Dequeue the longest-waiting players for one pairing, all under a single lock.
    pub async fn next_pairing(&self, ai_available: bool) -> Option<Pairing> {
        let mut waiting = self.waiting.lock().await;
        if waiting.len() >= 2 {
            let first = waiting.pop_front()?;
            let second = waiting.pop_front()?;
            return Some(Pairing::PlayerVsPlayer(first, second));
        }
        if ai_available {
            return waiting.pop_front().map(Pairing::PlayerVsAi);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_enqueue_keeps_position() {
        let queue = MatchmakingQueue::new();
        assert_eq!(queue.enqueue("a").await, 1);
        assert_eq!(queue.enqueue("b").await, 2);
        assert_eq!(queue.enqueue("a").await, 1);
        assert_eq!(queue.len().await, 2);
    }

    #[tokio::test]
    async fn pairs_two_longest_waiting_first() {
        let queue = MatchmakingQueue::new();
        for id in ["a", "b", "c"] {
            queue.enqueue(id).await;
        }
        assert_eq!(
            queue.next_pairing(true).await,
            Some(Pairing::PlayerVsPlayer("a".into(), "b".into()))
        );
        assert_eq!(
            queue.next_pairing(true).await,
            Some(Pairing::PlayerVsAi("c".into()))
        );
        assert_eq!(queue.next_pairing(true).await, None);
    }

    #[tokio::test]
    async fn lone_player_waits_without_ai() {
        let queue = MatchmakingQueue::new();
        queue.enqueue("a").await;
        assert_eq!(queue.next_pairing(false).await, None);
        assert!(queue.contains("a").await);
    }
}
