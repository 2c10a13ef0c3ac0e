//! Reading statistics for Bibliotheque.
//!
//! [`compute`] derives a [`Stats`] snapshot from one reader's records.
//! Everything else in this module is a pure transform over snapshots:
//! goal progress, fun facts, challenges and badges, and the two-reader
//! combined view. Nothing is cached; callers recompute when records change.

pub mod achievements;
pub mod combined;
pub mod engine;
pub mod fun_fact;
pub mod goal;
pub mod streak;

pub use achievements::{badges, challenges, Badge, Challenge, Metric, BADGES, CHALLENGES};
pub use combined::{
    find_shared_books, merge, merge_genres, pick_shortest, CombinedStats, RecapScope, RecapView,
    SharedBook,
};
pub use engine::{compute, top_genres, Stats};
pub use fun_fact::fun_fact;
pub use goal::GoalProgress;
pub use streak::{longest_streak, reading_days};
