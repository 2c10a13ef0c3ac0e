//! Annual goal progress.

use serde::{Deserialize, Serialize};

use crate::config::MIN_GOAL;

/// How far a reader is toward their annual goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Books finished this year.
    pub total_books: u32,
    /// The goal, clamped to at least 1.
    pub goal: u32,
    /// Whole percent complete, capped at 100.
    pub percent: u32,
    /// Books left to reach the goal, never negative.
    pub remaining: u32,
}

impl GoalProgress {
    /// Compute progress for `total_books` against `goal`.
    ///
    /// A goal of 0 is treated as 1.
    pub fn new(total_books: u32, goal: u32) -> Self {
        let goal = goal.max(MIN_GOAL);
        let ratio = f64::from(total_books) / f64::from(goal);
        let percent = ((ratio * 100.0).round() as u32).min(100);
        Self {
            total_books,
            goal,
            percent,
            remaining: goal.saturating_sub(total_books),
        }
    }

    /// Whether the goal has been reached.
    pub fn is_met(&self) -> bool {
        self.total_books >= self.goal
    }
}
