//! High score tracking
//!
//! A single all-time best score. Updates are strictly-greater-than: an equal
//! or lower score never replaces the stored one.

use serde::{Deserialize, Serialize};

/// Read/update access to the persisted best score
pub trait HighScoreStore {
    /// Current best score (0 when nothing is stored)
    fn high_score(&self) -> u64;

    /// Store `score` if it beats the current best. Returns true if stored.
    fn set_high_score_if_higher(&mut self, score: u64) -> bool;
}

/// The all-time best score record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Replace the best if `score` qualifies. Returns true if replaced.
    pub fn set_if_higher(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New high score {} (was {})", score, self.score);
        self.score = score;
        true
    }
}

impl HighScoreStore for BestScore {
    fn high_score(&self) -> u64 {
        self.score
    }

    fn set_high_score_if_higher(&mut self, score: u64) -> bool {
        self.set_if_higher(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strictly_higher_replaces() {
        let mut best = BestScore::new(50);
        assert!(!best.set_if_higher(50));
        assert!(!best.set_if_higher(10));
        assert_eq!(best.high_score(), 50);
        assert!(best.set_if_higher(51));
        assert_eq!(best.high_score(), 51);
    }

    #[test]
    fn test_zero_does_not_qualify_on_empty() {
        let best = BestScore::default();
        assert!(!best.qualifies(0));
        assert!(best.qualifies(1));
    }
}
