//! Core types for Bibliotheque.
//!
//! Book records, shelves and genres, plus the backup format used to move
//! libraries between installs.

pub mod backup;
pub mod book;

pub use backup::{merge_by_id, Backup, BACKUP_VERSION};
pub use book::{BookRecord, Genre, Shelf, KNOWN_GENRES, MAX_RATING};
