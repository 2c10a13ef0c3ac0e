//! The reading statistics engine.
//!
//! [`compute`] turns one reader's records into a [`Stats`] snapshot. It is a
//! pure function of its inputs: the reference date is passed in rather than
//! read from the clock, and nothing is cached between calls.
//!
//! Year scoping rules:
//! - A finished book counts toward the reference year when its finish date
//!   is in that year, or when it has no finish date at all.
//! - The monthly histogram only counts books that do have a finish date.
//! - Streaks look at every record with a start date, regardless of year.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ReaderSettings;
use crate::core::{BookRecord, Genre, Shelf};
use crate::stats::goal::GoalProgress;
use crate::stats::streak;

/// Highest heatmap intensity for a single month.
pub const HEATMAP_MAX_LEVEL: u32 = 5;

/// Statistics for one reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Calendar year the stats are scoped to.
    pub year: i32,
    /// Every record, input order.
    pub books: Vec<BookRecord>,
    /// Records on the finished shelf.
    pub finished: Vec<BookRecord>,
    /// Records on the currently-reading shelf.
    pub currently_reading: Vec<BookRecord>,
    /// Records on the want-to-read shelf.
    pub want_to_read: Vec<BookRecord>,
    /// Finished records that count toward this year.
    pub finished_this_year: Vec<BookRecord>,
    /// Number of books finished this year.
    pub total_books: u32,
    /// Pages across books finished this year.
    pub total_pages: u64,
    /// Books per elapsed month, one decimal.
    pub avg_per_month: f64,
    /// Reading pace over fully dated books with a known length.
    pub pages_per_day: u32,
    /// Finished-this-year count per genre.
    pub genre_counts: BTreeMap<Genre, u32>,
    /// Longest book finished this year.
    pub longest_book: Option<BookRecord>,
    /// Shortest book finished this year with a known length.
    pub shortest_book: Option<BookRecord>,
    /// Best-rated book finished this year.
    pub highest_rated: Option<BookRecord>,
    /// Mean rating over rated books finished this year, one decimal.
    pub avg_rating: f64,
    /// Books finished per month, January first.
    pub monthly_data: [u32; 12],
    /// Longest run of consecutive reading days.
    pub longest_streak: u32,
    /// Distinct reading days seen by the streak walk.
    pub reading_days: usize,
    /// Annual goal as configured.
    pub goal: u32,
}

/// Compute statistics for one reader's records.
///
/// Never fails: missing dates, unknown page counts and empty input all
/// degrade to zero or `None` values.
pub fn compute(
    records: &[BookRecord],
    settings: &ReaderSettings,
    reference_date: NaiveDate,
) -> Stats {
    let year = reference_date.year();

    let on_shelf = |shelf: Shelf| -> Vec<BookRecord> {
        records
            .iter()
            .filter(|b| b.shelf == shelf)
            .cloned()
            .collect()
    };
    let finished = on_shelf(Shelf::Finished);
    let currently_reading = on_shelf(Shelf::CurrentlyReading);
    let want_to_read = on_shelf(Shelf::WantToRead);

    let finished_this_year: Vec<BookRecord> = finished
        .iter()
        .filter(|b| b.date_finished.map_or(true, |d| d.year() == year))
        .cloned()
        .collect();

    let total_books = finished_this_year.len() as u32;
    let total_pages: u64 = finished_this_year.iter().map(|b| u64::from(b.pages)).sum();

    let avg_per_month = if total_books > 0 {
        round1(f64::from(total_books) / f64::from(reference_date.month()))
    } else {
        0.0
    };

    let days = streak::reading_days(records, reference_date);
    let longest_streak = streak::longest_streak(&days);

    let stats = Stats {
        year,
        books: records.to_vec(),
        pages_per_day: pages_per_day(&finished_this_year),
        genre_counts: genre_counts(&finished_this_year),
        longest_book: first_max_by_key(
            finished_this_year.iter().filter(|b| b.pages > 0),
            |b| b.pages,
        ),
        shortest_book: first_min_by_key(
            finished_this_year.iter().filter(|b| b.pages > 0),
            |b| b.pages,
        ),
        highest_rated: first_max_by_key(
            finished_this_year.iter().filter(|b| b.is_rated()),
            |b| b.rating,
        ),
        avg_rating: average_rating(&finished_this_year),
        monthly_data: monthly_data(&finished_this_year),
        longest_streak,
        reading_days: days.len(),
        goal: settings.goal,
        total_books,
        total_pages,
        avg_per_month,
        finished,
        currently_reading,
        want_to_read,
        finished_this_year,
    };

    tracing::trace!(
        year,
        total_books = stats.total_books,
        total_pages = stats.total_pages,
        longest_streak = stats.longest_streak,
        "computed reading stats"
    );

    stats
}

impl Stats {
    /// Progress toward the annual goal.
    pub fn goal_progress(&self) -> GoalProgress {
        GoalProgress::new(self.total_books, self.goal)
    }

    /// Number of distinct genres finished this year.
    pub fn genres_explored(&self) -> usize {
        self.genre_counts.len()
    }

    /// Rated books on the finished shelf, across all years.
    pub fn rated_finished_count(&self) -> usize {
        self.finished.iter().filter(|b| b.is_rated()).count()
    }

    /// Whether any finished book got a top rating.
    pub fn has_five_star(&self) -> bool {
        self.finished
            .iter()
            .any(|b| b.rating == crate::core::MAX_RATING)
    }

    /// Monthly counts clamped to heatmap intensities.
    pub fn heatmap_levels(&self) -> [u32; 12] {
        self.monthly_data.map(|count| count.min(HEATMAP_MAX_LEVEL))
    }

    /// The `n` most-read genres.
    pub fn top_genres(&self, n: usize) -> Vec<(Genre, u32)> {
        top_genres(&self.genre_counts, n)
    }

    /// The fun fact for this reader's page count.
    pub fn fun_fact(&self) -> String {
        crate::stats::fun_fact::fun_fact(self.total_pages)
    }
}

/// The `n` genres with the highest counts.
///
/// Ties keep genre name order.
pub fn top_genres(counts: &BTreeMap<Genre, u32>, n: usize) -> Vec<(Genre, u32)> {
    let mut ranked: Vec<(Genre, u32)> = counts.iter().map(|(g, c)| (g.clone(), *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Round to one decimal place on the exact binary value.
///
/// `1.15` is stored just below 1.15 and rounds down to `1.1`. Exact ties
/// (`x.25`, `x.75`) round away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let magnitude = value.abs();
    // Multiplying by powers of two is exact, so this detects true ties only.
    let exact_tie = (magnitude * 4.0).fract() == 0.0 && (magnitude * 2.0).fract() != 0.0;
    let rounded = if exact_tie {
        (magnitude * 10.0).ceil() / 10.0
    } else {
        format!("{:.1}", magnitude).parse().unwrap_or(magnitude)
    };
    rounded.copysign(value)
}

fn pages_per_day(books: &[BookRecord]) -> u32 {
    let mut total_pages: u64 = 0;
    let mut total_days: i64 = 0;

    for book in books {
        if let (Some(start), Some(end)) = (book.date_started, book.date_finished) {
            if book.pages > 0 {
                total_days += (end - start).num_days().max(1);
                total_pages += u64::from(book.pages);
            }
        }
    }

    if total_days > 0 {
        (total_pages as f64 / total_days as f64).round() as u32
    } else {
        0
    }
}

fn genre_counts(books: &[BookRecord]) -> BTreeMap<Genre, u32> {
    let mut counts = BTreeMap::new();
    for genre in books.iter().filter_map(|b| b.genre.as_ref()) {
        *counts.entry(genre.clone()).or_insert(0) += 1;
    }
    counts
}

fn average_rating(books: &[BookRecord]) -> f64 {
    let (sum, count) = books
        .iter()
        .filter(|b| b.is_rated())
        .fold((0u32, 0u32), |(sum, count), b| {
            (sum + u32::from(b.rating), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        round1(f64::from(sum) / f64::from(count))
    }
}

fn monthly_data(books: &[BookRecord]) -> [u32; 12] {
    let mut months = [0u32; 12];
    for date in books.iter().filter_map(|b| b.date_finished) {
        months[date.month0() as usize] += 1;
    }
    months
}

/// Fold keeping the first record with the strictly greatest key.
fn first_max_by_key<'a, K: Ord>(
    books: impl Iterator<Item = &'a BookRecord>,
    key: impl Fn(&BookRecord) -> K,
) -> Option<BookRecord> {
    books
        .fold(None::<&BookRecord>, |best, b| match best {
            Some(current) if key(b) <= key(current) => Some(current),
            _ => Some(b),
        })
        .cloned()
}

/// Fold keeping the first record with the strictly smallest key.
fn first_min_by_key<'a, K: Ord>(
    books: impl Iterator<Item = &'a BookRecord>,
    key: impl Fn(&BookRecord) -> K,
) -> Option<BookRecord> {
    books
        .fold(None::<&BookRecord>, |best, b| match best {
            Some(current) if key(b) >= key(current) => Some(current),
            _ => Some(b),
        })
        .cloned()
}
