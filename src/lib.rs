//! Bibliotheque - reading statistics for a shared two-reader library.
//!
//! The crate turns a reader's book records into goal progress, streaks,
//! genre breakdowns, monthly trends, superlatives and achievements. A
//! combined view merges two readers' statistics for a joint recap.
//! Storage and presentation live elsewhere: everything here works on
//! in-memory records with an explicit reference date.

pub mod config;
pub mod core;
pub mod error;
pub mod stats;

pub use config::{Config, ReaderId, ReaderSettings};
pub use crate::core::{merge_by_id, Backup, BookRecord, Genre, Shelf};
pub use error::{BiblioError, FailOpen, Result};
pub use stats::{
    badges, challenges, compute, find_shared_books, fun_fact, merge, Badge, Challenge,
    CombinedStats, GoalProgress, RecapScope, RecapView, SharedBook, Stats,
};
