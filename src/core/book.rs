//! Book record types for Bibliotheque.
//!
//! A [`BookRecord`] is one entry on a reader's shelves. Records arrive from
//! a loosely-typed key-value store, so deserialization is lenient: blank or
//! malformed dates become `None`, junk page counts become `0`, and unknown
//! shelves fall back to want-to-read. Nothing in this module rejects a
//! record for bad field values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BiblioError, Result};

/// Highest rating a reader can give.
pub const MAX_RATING: u8 = 5;

/// Genre labels offered by the entry form.
///
/// Genres are opaque category keys; labels outside this list are still
/// counted, they are just not "known".
pub const KNOWN_GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Mystery",
    "Thriller",
    "Romance",
    "Sci-Fi",
    "Fantasy",
    "Horror",
    "Biography",
    "Memoir",
    "Self-Help",
    "History",
    "Science",
    "Philosophy",
    "Poetry",
    "Business",
    "Psychology",
    "Travel",
    "Cooking",
    "Art",
    "Religion",
    "Other",
];

/// The shelf a book sits on. A record is on exactly one shelf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shelf {
    /// Being read right now.
    CurrentlyReading,
    /// Done.
    Finished,
    /// On the wishlist.
    #[default]
    WantToRead,
}

impl Shelf {
    /// Get all shelf variants in display order.
    pub fn all() -> &'static [Shelf] {
        &[Shelf::CurrentlyReading, Shelf::Finished, Shelf::WantToRead]
    }

    /// Get the display name for this shelf.
    pub fn display_name(&self) -> &'static str {
        match self {
            Shelf::CurrentlyReading => "Currently Reading",
            Shelf::Finished => "Finished",
            Shelf::WantToRead => "Want to Read",
        }
    }

    /// Get the storage key for this shelf.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::CurrentlyReading => "currently-reading",
            Shelf::Finished => "finished",
            Shelf::WantToRead => "want-to-read",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shelf {
    type Err = BiblioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "currently-reading" => Ok(Shelf::CurrentlyReading),
            "finished" => Ok(Shelf::Finished),
            "want-to-read" => Ok(Shelf::WantToRead),
            other => Err(BiblioError::serde(format!("unknown shelf '{}'", other))),
        }
    }
}

/// A genre label. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genre(String);

impl Genre {
    /// Create a genre from a label, trimming whitespace. Blank labels are `None`.
    pub fn new(label: impl AsRef<str>) -> Option<Self> {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label is one of [`KNOWN_GENRES`].
    pub fn is_known(&self) -> bool {
        KNOWN_GENRES.contains(&self.0.as_str())
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One book on a reader's shelves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Unique identifier, never reused. Missing or non-string ids read as
    /// blank and the record is rejected by [`BookRecord::validate`].
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Display author.
    #[serde(default)]
    pub author: String,
    /// Page count. `0` means unknown.
    #[serde(default, deserialize_with = "lenient::count")]
    pub pages: u32,
    /// Bookmark position, meaningful only while currently reading.
    #[serde(default, deserialize_with = "lenient::count")]
    pub current_page: u32,
    /// Day reading started.
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_started: Option<NaiveDate>,
    /// Day reading finished.
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_finished: Option<NaiveDate>,
    /// Genre label.
    #[serde(
        default,
        deserialize_with = "lenient::genre",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<Genre>,
    /// Rating 0-5, `0` meaning unrated.
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: u8,
    /// Shelf the book sits on.
    #[serde(default, deserialize_with = "lenient::shelf")]
    pub shelf: Shelf,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Cover image URL.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover: Option<String>,
    /// When the record was first added.
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub added_at: Option<DateTime<Utc>>,
}

impl BookRecord {
    /// Create a record with the given identity and shelf; everything else empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        shelf: Shelf,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            pages: 0,
            current_page: 0,
            date_started: None,
            date_finished: None,
            genre: None,
            rating: 0,
            shelf,
            notes: String::new(),
            cover: None,
            added_at: None,
        }
    }

    /// Set the page count.
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Set the bookmark position.
    pub fn with_current_page(mut self, current_page: u32) -> Self {
        self.current_page = current_page;
        self
    }

    /// Set the start date.
    pub fn with_started(mut self, date: NaiveDate) -> Self {
        self.date_started = Some(date);
        self
    }

    /// Set the finish date.
    pub fn with_finished(mut self, date: NaiveDate) -> Self {
        self.date_finished = Some(date);
        self
    }

    /// Set the genre. Blank labels clear it.
    pub fn with_genre(mut self, label: &str) -> Self {
        self.genre = Genre::new(label);
        self
    }

    /// Set the rating, clamped to [`MAX_RATING`].
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating.min(MAX_RATING);
        self
    }

    /// Set the cover URL. Blank URLs clear it.
    pub fn with_cover(mut self, cover: &str) -> Self {
        let trimmed = cover.trim();
        self.cover = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Check the record has a usable identity.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(BiblioError::invalid_record(
                self.title.clone(),
                "record has no id",
            ));
        }
        Ok(())
    }

    /// Whether the reader gave this book a rating.
    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }

    /// Apply the write-path shelf rule: a currently-reading book with a
    /// finish date moves to the finished shelf.
    pub fn normalized(mut self) -> Self {
        if self.shelf == Shelf::CurrentlyReading && self.date_finished.is_some() {
            self.shelf = Shelf::Finished;
        }
        self
    }

    /// Reading progress through the book as a whole percentage (0-100).
    ///
    /// Returns 0 when the page count is unknown.
    pub fn progress_percent(&self) -> u32 {
        if self.pages == 0 {
            return 0;
        }
        let percent = (f64::from(self.current_page) / f64::from(self.pages) * 100.0).round();
        (percent as u32).min(100)
    }

    /// Whether two records describe the same book.
    ///
    /// Title and author are compared case-insensitively after trimming.
    /// Records with a blank title or author never match anything.
    pub fn matches(&self, other: &BookRecord) -> bool {
        match (self.match_key(), other.match_key()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn match_key(&self) -> Option<(String, String)> {
        let title = self.title.trim().to_lowercase();
        let author = self.author.trim().to_lowercase();
        if title.is_empty() || author.is_empty() {
            None
        } else {
            Some((title, author))
        }
    }
}

/// Tolerant field deserializers for records coming out of untyped storage.
mod lenient {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{Genre, Shelf, MAX_RATING};

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            _ => String::new(),
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().map(to_count).unwrap_or(0))
    }

    pub fn rating<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let raw = count(d)?;
        Ok(raw.min(u32::from(MAX_RATING)) as u8)
    }

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => parse_date(&s),
            _ => None,
        })
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
            _ => None,
        })
    }

    pub fn genre<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Genre>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => Genre::new(s),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
    }

    pub fn shelf<'de, D: Deserializer<'de>>(d: D) -> Result<Shelf, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => s.parse().unwrap_or_else(|_| {
                tracing::debug!("unknown shelf '{}', using want-to-read", s);
                Shelf::default()
            }),
            _ => Shelf::default(),
        })
    }

    /// Parse a calendar date, accepting full RFC 3339 timestamps too.
    pub(super) fn parse_date(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
        tracing::debug!("ignoring malformed date '{}'", trimmed);
        None
    }

    fn to_count(value: &Value) -> u32 {
        match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    u.min(u64::from(u32::MAX)) as u32
                } else if let Some(f) = n.as_f64() {
                    if f.is_finite() && f > 0.0 {
                        f.trunc().min(f64::from(u32::MAX)) as u32
                    } else {
                        0
                    }
                } else {
                    0
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
                .unwrap_or(0),
            _ => 0,
        }
    }
}
