//! Reading challenges and badges.
//!
//! Both are declarative tables: each row names a [`Metric`] read off a
//! [`Stats`] snapshot and a target. Rows are evaluated independently.

use serde::{Deserialize, Serialize};

use crate::config::MIN_GOAL;
use crate::stats::Stats;

/// A value read off a stats snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Books finished this year.
    BooksThisYear,
    /// Pages finished this year.
    PagesThisYear,
    /// Distinct genres finished this year.
    GenresExplored,
    /// Longest reading streak in days.
    LongestStreak,
    /// Reading pace in pages per day.
    PagesPerDay,
    /// Books on the currently-reading shelf.
    CurrentlyReading,
    /// Rated books on the finished shelf.
    RatedBooks,
    /// Books on any shelf.
    ShelfSize,
    /// 1 when any finished book is rated 5, else 0.
    FiveStarRating,
}

impl Metric {
    /// Read the metric's current value.
    pub fn read(&self, stats: &Stats) -> u64 {
        match self {
            Metric::BooksThisYear => u64::from(stats.total_books),
            Metric::PagesThisYear => stats.total_pages,
            Metric::GenresExplored => stats.genres_explored() as u64,
            Metric::LongestStreak => u64::from(stats.longest_streak),
            Metric::PagesPerDay => u64::from(stats.pages_per_day),
            Metric::CurrentlyReading => stats.currently_reading.len() as u64,
            Metric::RatedBooks => stats.rated_finished_count() as u64,
            Metric::ShelfSize => stats.books.len() as u64,
            Metric::FiveStarRating => u64::from(stats.has_five_star()),
        }
    }
}

/// Where a rule's target comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A fixed number.
    Fixed(u64),
    /// The reader's annual goal.
    Goal,
}

impl Target {
    fn resolve(&self, stats: &Stats) -> u64 {
        match self {
            Target::Fixed(n) => (*n).max(1),
            Target::Goal => u64::from(stats.goal.max(MIN_GOAL)),
        }
    }
}

/// A row in a challenge or badge table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name. `{goal}` is replaced by the goal.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// What is measured.
    pub metric: Metric,
    /// What counts as done.
    pub target: Target,
}

impl Rule {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        metric: Metric,
        target: Target,
    ) -> Self {
        Self {
            id,
            name,
            description,
            metric,
            target,
        }
    }

    fn title(&self, target: u64) -> String {
        self.name.replace("{goal}", &target.to_string())
    }
}

/// Challenges, in display order.
pub const CHALLENGES: &[Rule] = &[
    Rule::new(
        "annual-goal",
        "Read {goal} Books",
        "Your annual reading goal",
        Metric::BooksThisYear,
        Target::Goal,
    ),
    Rule::new(
        "page-turner",
        "Page Turner",
        "Read 5,000 pages this year",
        Metric::PagesThisYear,
        Target::Fixed(5000),
    ),
    Rule::new(
        "genre-explorer",
        "Genre Explorer",
        "Read books from 5+ different genres",
        Metric::GenresExplored,
        Target::Fixed(5),
    ),
    Rule::new(
        "reading-streak",
        "Reading Streak",
        "Maintain a 30-day reading streak",
        Metric::LongestStreak,
        Target::Fixed(30),
    ),
    Rule::new(
        "speed-reader",
        "Speed Reader",
        "Average 50+ pages per day",
        Metric::PagesPerDay,
        Target::Fixed(50),
    ),
    Rule::new(
        "bookworm",
        "Bookworm",
        "Have 3+ books in progress at once",
        Metric::CurrentlyReading,
        Target::Fixed(3),
    ),
];

/// Badges, in display order.
pub const BADGES: &[Rule] = &[
    Rule::new(
        "first-chapter",
        "First Chapter",
        "Finish your first book",
        Metric::BooksThisYear,
        Target::Fixed(1),
    ),
    Rule::new(
        "bookworm",
        "Bookworm",
        "Read 10 books",
        Metric::BooksThisYear,
        Target::Fixed(10),
    ),
    Rule::new(
        "royalty",
        "Royalty",
        "Read 25 books",
        Metric::BooksThisYear,
        Target::Fixed(25),
    ),
    Rule::new(
        "champion",
        "Champion",
        "Read 50 books",
        Metric::BooksThisYear,
        Target::Fixed(50),
    ),
    Rule::new(
        "genre-explorer",
        "Genre Explorer",
        "Read 5+ genres",
        Metric::GenresExplored,
        Target::Fixed(5),
    ),
    Rule::new(
        "on-fire",
        "On Fire",
        "7-day streak",
        Metric::LongestStreak,
        Target::Fixed(7),
    ),
    Rule::new(
        "lightning",
        "Lightning",
        "30-day streak",
        Metric::LongestStreak,
        Target::Fixed(30),
    ),
    Rule::new(
        "critic",
        "Critic",
        "Rate 10+ books",
        Metric::RatedBooks,
        Target::Fixed(10),
    ),
    Rule::new(
        "page-turner",
        "Page Turner",
        "Read 5,000 pages",
        Metric::PagesThisYear,
        Target::Fixed(5000),
    ),
    Rule::new(
        "librarian",
        "Librarian",
        "50+ books on shelves",
        Metric::ShelfSize,
        Target::Fixed(50),
    ),
    Rule::new(
        "five-stars",
        "Five Stars",
        "Give a 5-star rating",
        Metric::FiveStarRating,
        Target::Fixed(1),
    ),
    Rule::new(
        "goal-crusher",
        "Goal Crusher",
        "Meet your annual goal",
        Metric::BooksThisYear,
        Target::Goal,
    ),
];

/// An evaluated challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub current: u64,
    pub target: u64,
    /// Percent toward the target. Not capped; may exceed 100.
    pub progress: f64,
    pub completed: bool,
}

impl Challenge {
    /// Progress rounded and capped for display.
    pub fn display_percent(&self) -> u32 {
        self.progress.round().min(100.0) as u32
    }
}

/// An evaluated badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub current: u64,
    pub target: u64,
    pub earned: bool,
}

/// Evaluate one rule to `(current, target)`.
fn measure(rule: &Rule, stats: &Stats) -> (u64, u64) {
    (rule.metric.read(stats), rule.target.resolve(stats))
}

/// Evaluate a challenge rule against a snapshot.
pub fn evaluate_challenge(rule: &Rule, stats: &Stats) -> Challenge {
    let (current, target) = measure(rule, stats);
    Challenge {
        id: rule.id.to_string(),
        title: rule.title(target),
        description: rule.description.to_string(),
        current,
        target,
        progress: current as f64 / target as f64 * 100.0,
        completed: current >= target,
    }
}

/// Evaluate a badge rule against a snapshot.
pub fn evaluate_badge(rule: &Rule, stats: &Stats) -> Badge {
    let (current, target) = measure(rule, stats);
    Badge {
        id: rule.id.to_string(),
        name: rule.title(target),
        description: rule.description.to_string(),
        current,
        target,
        earned: current >= target,
    }
}

/// All challenges for a reader.
pub fn challenges(stats: &Stats) -> Vec<Challenge> {
    CHALLENGES
        .iter()
        .map(|rule| evaluate_challenge(rule, stats))
        .collect()
}

/// All badges for a reader.
pub fn badges(stats: &Stats) -> Vec<Badge> {
    BADGES.iter().map(|rule| evaluate_badge(rule, stats)).collect()
}
