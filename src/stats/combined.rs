//! The two-reader combined view and year-in-review recap.
//!
//! Combined figures are built from each reader's already-computed
//! [`Stats`], not from their merged records. Averages are therefore
//! approximations: books per month is the sum of the two rounded
//! averages, and the average rating is the plain mean of the two readers'
//! means.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ReaderId};
use crate::core::{BookRecord, Genre};
use crate::stats::engine::{round1, top_genres};
use crate::stats::Stats;

/// Label used for the combined recap.
pub const COMBINED_LABEL: &str = "Both of Us";

/// Headline figures for a recap, either one reader's or both combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedStats {
    pub total_books: u32,
    pub total_pages: u64,
    pub avg_per_month: f64,
    pub pages_per_day: u32,
    pub longest_streak: u32,
    pub avg_rating: f64,
    pub genre_counts: BTreeMap<Genre, u32>,
    pub longest_book: Option<BookRecord>,
    pub shortest_book: Option<BookRecord>,
    pub highest_rated: Option<BookRecord>,
    pub monthly_data: [u32; 12],
    /// First reader's books, then the second's.
    pub finished_this_year: Vec<BookRecord>,
}

impl CombinedStats {
    /// The `n` most-read genres.
    pub fn top_genres(&self, n: usize) -> Vec<(Genre, u32)> {
        top_genres(&self.genre_counts, n)
    }
}

impl From<&Stats> for CombinedStats {
    /// A single reader's figures in the combined shape.
    fn from(stats: &Stats) -> Self {
        Self {
            total_books: stats.total_books,
            total_pages: stats.total_pages,
            avg_per_month: stats.avg_per_month,
            pages_per_day: stats.pages_per_day,
            longest_streak: stats.longest_streak,
            avg_rating: stats.avg_rating,
            genre_counts: stats.genre_counts.clone(),
            longest_book: stats.longest_book.clone(),
            shortest_book: stats.shortest_book.clone(),
            highest_rated: stats.highest_rated.clone(),
            monthly_data: stats.monthly_data,
            finished_this_year: stats.finished_this_year.clone(),
        }
    }
}

/// Combine two readers' stats.
pub fn merge(first: &Stats, second: &Stats) -> CombinedStats {
    let mut monthly_data = first.monthly_data;
    for (slot, count) in monthly_data.iter_mut().zip(second.monthly_data) {
        *slot += count;
    }

    let mut finished_this_year = first.finished_this_year.clone();
    finished_this_year.extend(second.finished_this_year.iter().cloned());

    CombinedStats {
        total_books: first.total_books + second.total_books,
        total_pages: first.total_pages + second.total_pages,
        avg_per_month: round1(first.avg_per_month + second.avg_per_month),
        pages_per_day: first.pages_per_day + second.pages_per_day,
        longest_streak: first.longest_streak.max(second.longest_streak),
        avg_rating: round1((first.avg_rating + second.avg_rating) / 2.0),
        genre_counts: merge_genres(&first.genre_counts, &second.genre_counts),
        longest_book: pick_larger(&first.longest_book, &second.longest_book, |b| {
            u64::from(b.pages)
        }),
        shortest_book: pick_shortest(&first.shortest_book, &second.shortest_book),
        highest_rated: pick_larger(&first.highest_rated, &second.highest_rated, |b| {
            u64::from(b.rating)
        }),
        monthly_data,
        finished_this_year,
    }
}

/// Sum genre counts key by key.
pub fn merge_genres(
    first: &BTreeMap<Genre, u32>,
    second: &BTreeMap<Genre, u32>,
) -> BTreeMap<Genre, u32> {
    let mut merged = first.clone();
    for (genre, count) in second {
        *merged.entry(genre.clone()).or_insert(0) += count;
    }
    merged
}

/// Pick the candidate with the larger key. Equal keys keep the first.
fn pick_larger(
    first: &Option<BookRecord>,
    second: &Option<BookRecord>,
    key: impl Fn(&BookRecord) -> u64,
) -> Option<BookRecord> {
    let first_key = first.as_ref().map_or(0, &key);
    let second_key = second.as_ref().map_or(0, &key);
    if first_key >= second_key {
        first.clone()
    } else {
        second.clone()
    }
}

/// Pick the shorter of two books. A missing side yields the other.
///
/// Equal page counts pick the second reader's book.
pub fn pick_shortest(
    first: &Option<BookRecord>,
    second: &Option<BookRecord>,
) -> Option<BookRecord> {
    match (first, second) {
        (None, other) | (other, None) => other.clone(),
        (Some(a), Some(b)) => {
            if a.pages < b.pages {
                Some(a.clone())
            } else {
                Some(b.clone())
            }
        }
    }
}

/// A book both readers have finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedBook {
    /// Title as the first reader entered it.
    pub title: String,
    /// Author as the first reader entered it.
    pub author: String,
    /// First reader's cover, else the second's.
    pub cover: Option<String>,
    pub rating1: u8,
    pub rating2: u8,
}

/// Find books on both finished lists.
///
/// For each of the first reader's books, the first matching book in the
/// second list is used. This is a pairwise scan, fine for personal-library
/// sizes.
pub fn find_shared_books(first: &[BookRecord], second: &[BookRecord]) -> Vec<SharedBook> {
    first
        .iter()
        .filter_map(|b1| {
            second.iter().find(|b2| b1.matches(b2)).map(|b2| SharedBook {
                title: b1.title.clone(),
                author: b1.author.clone(),
                cover: b1.cover.clone().or_else(|| b2.cover.clone()),
                rating1: b1.rating,
                rating2: b2.rating,
            })
        })
        .collect()
}

/// Whose year is being reviewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecapScope {
    /// Only one reader.
    Reader(ReaderId),
    /// Both readers together.
    #[default]
    Combined,
}

/// Number of genres highlighted in a recap.
pub const RECAP_TOP_GENRES: usize = 3;

/// Year-in-review figures for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapView {
    pub scope: RecapScope,
    pub year: i32,
    pub display_name: String,
    pub stats: CombinedStats,
    pub top_genres: Vec<(Genre, u32)>,
}

impl RecapView {
    /// Build the recap for `scope` from both readers' stats.
    pub fn build(scope: RecapScope, first: &Stats, second: &Stats, config: &Config) -> Self {
        let (display_name, stats) = match scope {
            RecapScope::Reader(reader) => {
                let source = match reader {
                    ReaderId::Partner1 => first,
                    ReaderId::Partner2 => second,
                };
                (
                    config.reader(reader).display_name(reader).to_string(),
                    CombinedStats::from(source),
                )
            }
            RecapScope::Combined => (COMBINED_LABEL.to_string(), merge(first, second)),
        };

        Self {
            scope,
            year: first.year,
            display_name,
            top_genres: stats.top_genres(RECAP_TOP_GENRES),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReaderSettings;
    use crate::core::Shelf;
    use crate::stats::compute;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(id: &str, title: &str, pages: u32, rating: u8) -> BookRecord {
        BookRecord::new(id, title, "Author", Shelf::Finished)
            .with_pages(pages)
            .with_rating(rating)
    }

    fn stats(books: &[BookRecord]) -> Stats {
        compute(books, &ReaderSettings::new("R", 24), date(2024, 6, 30))
    }

    fn genres(pairs: &[(&str, u32)]) -> BTreeMap<Genre, u32> {
        pairs
            .iter()
            .map(|(g, c)| (Genre::new(g).unwrap(), *c))
            .collect()
    }

    #[test]
    fn test_merge_sums_and_maxes() {
        let first = stats(&[
            book("a", "A", 300, 5).with_finished(date(2024, 3, 1)),
            book("b", "B", 200, 3).with_finished(date(2024, 3, 9)),
        ]);
        let second = stats(&[book("c", "C", 500, 0).with_finished(date(2024, 5, 1))]);

        let combined = merge(&first, &second);
        assert_eq!(combined.total_books, 3);
        assert_eq!(combined.total_pages, 1000);
        assert_eq!(combined.monthly_data[2], 2);
        assert_eq!(combined.monthly_data[4], 1);
        assert_eq!(combined.longest_book.as_ref().unwrap().id, "c");
        assert_eq!(combined.shortest_book.as_ref().unwrap().id, "b");
        assert_eq!(combined.highest_rated.as_ref().unwrap().id, "a");
        assert_eq!(combined.finished_this_year.len(), 3);
        assert_eq!(combined.finished_this_year[2].id, "c");
    }

    #[test]
    fn test_avg_rating_is_mean_of_means() {
        // Reader one: 5 and 3 -> 4.0. Reader two: unrated -> 0.
        let first = stats(&[book("a", "A", 1, 5), book("b", "B", 1, 3)]);
        let second = stats(&[book("c", "C", 1, 0)]);
        assert_eq!(merge(&first, &second).avg_rating, 2.0);
    }

    #[test]
    fn test_avg_rating_mean_rounds_stored_value() {
        // 10 / 3 -> 3.3 and 4.0; (3.3 + 4.0) / 2 is stored just below 3.65
        let first = stats(&[book("a", "A", 1, 4), book("b", "B", 1, 3), book("c", "C", 1, 3)]);
        let second = stats(&[book("d", "D", 1, 4)]);
        assert_eq!(first.avg_rating, 3.3);
        assert_eq!(second.avg_rating, 4.0);
        assert_eq!(merge(&first, &second).avg_rating, 3.6);
    }

    #[test]
    fn test_avg_per_month_sums_rounded_averages() {
        // 6 months elapsed: 1/6 = 0.2 each, summed 0.4 rather than 2/6 = 0.3
        let first = stats(&[book("a", "A", 1, 0)]);
        let second = stats(&[book("b", "B", 1, 0)]);
        assert_eq!(first.avg_per_month, 0.2);
        assert_eq!(merge(&first, &second).avg_per_month, 0.4);
    }

    #[test]
    fn test_streak_takes_max() {
        let first = stats(&[book("a", "A", 1, 0)
            .with_started(date(2024, 1, 1))
            .with_finished(date(2024, 1, 4))]);
        let second = stats(&[book("b", "B", 1, 0)
            .with_started(date(2024, 1, 5))
            .with_finished(date(2024, 1, 6))]);
        // Streaks are per reader: 4 and 2, not a joined 6.
        assert_eq!(merge(&first, &second).longest_streak, 4);
    }

    #[test]
    fn test_ties_favour_first_reader_for_longest_and_rated() {
        let first = stats(&[book("a", "A", 300, 4)]);
        let second = stats(&[book("b", "B", 300, 4)]);
        let combined = merge(&first, &second);
        assert_eq!(combined.longest_book.unwrap().id, "a");
        assert_eq!(combined.highest_rated.unwrap().id, "a");
    }

    #[test]
    fn test_pick_shortest() {
        let a = Some(book("a", "A", 100, 0));
        let b = Some(book("b", "B", 100, 0));
        let c = Some(book("c", "C", 50, 0));

        assert_eq!(pick_shortest(&None, &None), None);
        assert_eq!(pick_shortest(&a, &None).unwrap().id, "a");
        assert_eq!(pick_shortest(&None, &b).unwrap().id, "b");
        assert_eq!(pick_shortest(&c, &a).unwrap().id, "c");
        assert_eq!(pick_shortest(&a, &c).unwrap().id, "c");
        assert_eq!(pick_shortest(&a, &b).unwrap().id, "b");
    }

    #[test]
    fn test_merge_empty_readers() {
        let combined = merge(&stats(&[]), &stats(&[]));
        assert_eq!(combined.total_books, 0);
        assert!(combined.longest_book.is_none());
        assert!(combined.shortest_book.is_none());
        assert!(combined.highest_rated.is_none());
        assert_eq!(combined.avg_rating, 0.0);
        assert!(combined.genre_counts.is_empty());
    }

    #[test]
    fn test_merge_genres_sums_per_key() {
        let merged = merge_genres(
            &genres(&[("Fantasy", 2), ("Poetry", 1)]),
            &genres(&[("Fantasy", 3), ("History", 4)]),
        );
        assert_eq!(
            merged,
            genres(&[("Fantasy", 5), ("History", 4), ("Poetry", 1)])
        );
    }

    #[test]
    fn test_shared_books_case_insensitive() {
        let first = vec![
            BookRecord::new("1", "Dune", "Frank Herbert", Shelf::Finished)
                .with_rating(5)
                .with_cover(""),
            BookRecord::new("2", "Emma", "Jane Austen", Shelf::Finished),
        ];
        let second = vec![
            BookRecord::new("x", " dune ", "FRANK HERBERT", Shelf::Finished)
                .with_rating(3)
                .with_cover("http://covers/dune.jpg"),
            BookRecord::new("y", "Dune", "Frank Herbert", Shelf::Finished)
                .with_cover("http://covers/other.jpg"),
        ];

        let shared = find_shared_books(&first, &second);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].title, "Dune");
        assert_eq!(shared[0].rating1, 5);
        assert_eq!(shared[0].rating2, 3);
        assert_eq!(shared[0].cover.as_deref(), Some("http://covers/dune.jpg"));
    }

    #[test]
    fn test_shared_books_prefers_first_reader_cover() {
        let first =
            vec![BookRecord::new("1", "Emma", "Jane Austen", Shelf::Finished).with_cover("mine")];
        let second =
            vec![BookRecord::new("2", "Emma", "Jane Austen", Shelf::Finished).with_cover("theirs")];
        assert_eq!(
            find_shared_books(&first, &second)[0].cover.as_deref(),
            Some("mine")
        );
    }

    #[test]
    fn test_shared_books_skip_blank_titles() {
        let first = vec![BookRecord::new("1", "", "", Shelf::Finished)];
        let second = vec![BookRecord::new("2", "", "", Shelf::Finished)];
        assert!(find_shared_books(&first, &second).is_empty());
    }

    #[test]
    fn test_recap_scopes() {
        let config = Config {
            partner1: ReaderSettings::new("Ada", 24),
            partner2: ReaderSettings::new("", 24),
        };
        let first = stats(&[book("a", "A", 100, 0).with_genre("Poetry")]);
        let second = stats(&[
            book("b", "B", 100, 0).with_genre("Art"),
            book("c", "C", 100, 0).with_genre("Art"),
        ]);

        let mine = RecapView::build(
            RecapScope::Reader(ReaderId::Partner1),
            &first,
            &second,
            &config,
        );
        assert_eq!(mine.display_name, "Ada");
        assert_eq!(mine.stats.total_books, 1);

        let theirs = RecapView::build(
            RecapScope::Reader(ReaderId::Partner2),
            &first,
            &second,
            &config,
        );
        assert_eq!(theirs.display_name, "Hannah");
        assert_eq!(theirs.stats.total_books, 2);

        let both = RecapView::build(RecapScope::Combined, &first, &second, &config);
        assert_eq!(both.display_name, COMBINED_LABEL);
        assert_eq!(both.year, 2024);
        assert_eq!(both.stats.total_books, 3);
        let top: Vec<(String, u32)> = both
            .top_genres
            .iter()
            .map(|(g, c)| (g.to_string(), *c))
            .collect();
        assert_eq!(
            top,
            vec![("Art".to_string(), 2), ("Poetry".to_string(), 1)]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_genres() -> impl Strategy<Value = BTreeMap<Genre, u32>> {
            proptest::collection::btree_map(
                prop::sample::select(vec!["Art", "Fantasy", "History", "Poetry", "Travel"])
                    .prop_map(|g| Genre::new(g).unwrap()),
                0u32..1000,
                0..5,
            )
        }

        proptest! {
            #[test]
            fn prop_merge_genres_commutative(a in arb_genres(), b in arb_genres()) {
                prop_assert_eq!(merge_genres(&a, &b), merge_genres(&b, &a));
            }

            #[test]
            fn prop_merge_genres_sums(a in arb_genres(), b in arb_genres()) {
                let merged = merge_genres(&a, &b);
                for (genre, count) in &merged {
                    let expected = a.get(genre).copied().unwrap_or(0) + b.get(genre).copied().unwrap_or(0);
                    prop_assert_eq!(*count, expected);
                }
                prop_assert!(a.keys().chain(b.keys()).all(|g| merged.contains_key(g)));
            }
        }
    }
}
