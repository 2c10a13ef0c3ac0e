//! Reading-day streaks.
//!
//! Every book with a start date marks each calendar day from its start
//! through its finish (or through the reference date while unfinished) as a
//! reading day. Overlapping books collapse onto the same days.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::core::BookRecord;

/// Collect the distinct reading days across all records.
///
/// Records without a start date, and records whose start falls after their
/// end, contribute nothing.
pub fn reading_days(records: &[BookRecord], reference_date: NaiveDate) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();

    for book in records {
        let Some(start) = book.date_started else {
            continue;
        };
        let end = book.date_finished.unwrap_or(reference_date);
        if start > end {
            tracing::debug!("book {} starts after it ends, no reading days", book.id);
            continue;
        }
        days.extend(start.iter_days().take_while(|d| *d <= end));
    }

    days
}

/// Longest run of consecutive days in a sorted day set.
///
/// A single day is a streak of 1 and no days is 0. With two or more days,
/// only runs that actually extend count: days that are all isolated
/// yield 0.
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    if days.len() == 1 {
        return 1;
    }

    let mut longest = 0;
    let mut current = 1;
    let mut prev: Option<NaiveDate> = None;

    for day in days {
        if let Some(p) = prev {
            if (*day - p).num_days() == 1 {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 1;
            }
        }
        prev = Some(*day);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Shelf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(id: &str, start: NaiveDate, end: Option<NaiveDate>) -> BookRecord {
        let book = BookRecord::new(id, "T", "A", Shelf::Finished).with_started(start);
        match end {
            Some(end) => book.with_finished(end),
            None => book,
        }
    }

    #[test]
    fn test_no_days_is_zero() {
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
    }

    #[test]
    fn test_single_day_book() {
        let d = date(2024, 4, 10);
        let days = reading_days(&[span("1", d, Some(d))], d);
        assert_eq!(days.len(), 1);
        assert_eq!(longest_streak(&days), 1);
    }

    #[test]
    fn test_unfinished_runs_to_reference_date() {
        let book = span("1", date(2024, 4, 1), None);
        let days = reading_days(&[book], date(2024, 4, 10));
        assert_eq!(days.len(), 10);
        assert_eq!(longest_streak(&days), 10);
    }

    #[test]
    fn test_overlapping_books_collapse() {
        let books = vec![
            span("1", date(2024, 1, 1), Some(date(2024, 1, 5))),
            span("2", date(2024, 1, 3), Some(date(2024, 1, 8))),
        ];
        let days = reading_days(&books, date(2024, 12, 31));
        assert_eq!(days.len(), 8);
        assert_eq!(longest_streak(&days), 8);
    }

    #[test]
    fn test_gap_resets_run() {
        let books = vec![
            span("1", date(2024, 1, 1), Some(date(2024, 1, 3))),
            span("2", date(2024, 1, 10), Some(date(2024, 1, 14))),
        ];
        let days = reading_days(&books, date(2024, 12, 31));
        assert_eq!(longest_streak(&days), 5);
    }

    #[test]
    fn test_isolated_days_yield_zero() {
        let books = vec![
            span("1", date(2024, 1, 1), Some(date(2024, 1, 1))),
            span("2", date(2024, 1, 5), Some(date(2024, 1, 5))),
        ];
        let days = reading_days(&books, date(2024, 12, 31));
        assert_eq!(days.len(), 2);
        assert_eq!(longest_streak(&days), 0);
    }

    #[test]
    fn test_streak_crosses_year_boundary() {
        let book = span("1", date(2023, 12, 30), Some(date(2024, 1, 2)));
        let days = reading_days(&[book], date(2024, 6, 1));
        assert_eq!(longest_streak(&days), 4);
    }

    #[test]
    fn test_reversed_dates_ignored() {
        let book = span("1", date(2024, 5, 10), Some(date(2024, 5, 1)));
        assert!(reading_days(&[book], date(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_future_start_unfinished_ignored() {
        let book = span("1", date(2024, 7, 1), None);
        assert!(reading_days(&[book], date(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_undated_books_ignored() {
        let book = BookRecord::new("1", "T", "A", Shelf::CurrentlyReading);
        assert!(reading_days(&[book], date(2024, 6, 1)).is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_contiguous_cover_gives_full_streak(
                len in 2i64..120,
                cuts in proptest::collection::vec(0i64..120, 0..6),
            ) {
                // Split [0, len) into overlapping chunks; together they cover
                // every day exactly once or more.
                let origin = date(2024, 1, 1);
                let mut points: Vec<i64> = cuts.into_iter().filter(|c| *c < len).collect();
                points.push(0);
                points.sort_unstable();
                points.dedup();

                let mut books = Vec::new();
                for (i, start) in points.iter().enumerate() {
                    let end = points.get(i + 1).copied().unwrap_or(len - 1).min(len - 1);
                    books.push(span(
                        &i.to_string(),
                        origin + chrono::Duration::days(*start),
                        Some(origin + chrono::Duration::days(end)),
                    ));
                }

                let days = reading_days(&books, origin + chrono::Duration::days(365));
                prop_assert_eq!(days.len() as i64, len);
                prop_assert_eq!(longest_streak(&days) as i64, len);
            }
        }
    }
}
