//! Library backup format.
//!
//! A backup bundles both readers' shelves with their settings. Importing a
//! backup never overwrites existing records: only ids not already on the
//! shelf are appended.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Config, ReaderId};
use crate::core::book::BookRecord;
use crate::error::{BiblioError, Result};

/// Version string written into new backups.
pub const BACKUP_VERSION: &str = "1.0";

fn default_version() -> String {
    BACKUP_VERSION.to_string()
}

/// A full export of both readers' libraries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    /// Reader settings at export time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Config>,
    /// First reader's records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books_partner1: Option<Vec<BookRecord>>,
    /// Second reader's records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books_partner2: Option<Vec<BookRecord>>,
    /// When the export was taken.
    #[serde(rename = "exportedAt", default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    /// Format version.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Backup {
    /// Create a backup of both libraries.
    pub fn new(
        settings: Config,
        books_partner1: Vec<BookRecord>,
        books_partner2: Vec<BookRecord>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            settings: Some(settings),
            books_partner1: Some(books_partner1),
            books_partner2: Some(books_partner2),
            exported_at: Some(exported_at),
            version: default_version(),
        }
    }

    /// Parse a backup file's contents.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| BiblioError::serde(format!("invalid backup: {}", e)))
    }

    /// Render the backup as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested file name for this backup, dated by export day.
    pub fn file_name(&self) -> String {
        match self.exported_at {
            Some(ts) => format!("bibliotheque-backup-{}.json", ts.format("%Y-%m-%d")),
            None => "bibliotheque-backup.json".to_string(),
        }
    }

    /// Records in this backup for one reader, if the backup carries them.
    pub fn books_for(&self, reader: ReaderId) -> Option<&[BookRecord]> {
        match reader {
            ReaderId::Partner1 => self.books_partner1.as_deref(),
            ReaderId::Partner2 => self.books_partner2.as_deref(),
        }
    }

    /// Merge this backup's records for `reader` into `existing`.
    ///
    /// Returns the merged shelf and the number of records added. A backup
    /// without records for the reader leaves `existing` untouched.
    pub fn import_into(
        &self,
        reader: ReaderId,
        existing: Vec<BookRecord>,
    ) -> (Vec<BookRecord>, usize) {
        match self.books_for(reader) {
            Some(incoming) => merge_by_id(existing, incoming.to_vec()),
            None => (existing, 0),
        }
    }
}

/// Append incoming records whose id is not yet present.
///
/// Existing records are kept as-is and in order. Incoming records with a
/// blank id are dropped; an id repeated inside `incoming` is added once.
pub fn merge_by_id(
    existing: Vec<BookRecord>,
    incoming: Vec<BookRecord>,
) -> (Vec<BookRecord>, usize) {
    let mut seen: HashSet<String> = existing.iter().map(|b| b.id.clone()).collect();
    let mut merged = existing;
    let mut added = 0;

    for book in incoming {
        if let Err(err) = book.validate() {
            tracing::warn!("skipping imported record: {}", err);
            continue;
        }
        if seen.insert(book.id.clone()) {
            merged.push(book);
            added += 1;
        }
    }

    (merged, added)
}
