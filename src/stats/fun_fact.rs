//! Page-count fun facts.
//!
//! A fixed ladder of thresholds; the highest rung at or below the page
//! count picks the message.

/// One rung of the fun-fact ladder.
#[derive(Debug, Clone, Copy)]
pub struct FunFact {
    /// Minimum pages for this fact to apply.
    pub threshold: u64,
    render: fn(u64) -> String,
}

impl FunFact {
    /// Render this fact for a page count.
    pub fn render(&self, total_pages: u64) -> String {
        (self.render)(total_pages)
    }
}

/// All facts, thresholds ascending.
pub const FUN_FACTS: &[FunFact] = &[
    FunFact {
        threshold: 0,
        render: |_| "Start your reading journey: every page is an adventure!".to_string(),
    },
    FunFact {
        threshold: 100,
        render: |p| {
            format!(
                "You've read {} pages, taller than a stack of {} novels!",
                group_thousands(p),
                p / 250
            )
        },
    },
    FunFact {
        threshold: 500,
        render: |p| {
            format!(
                "{} pages read, about the height of {:.1} rulers stacked up!",
                group_thousands(p),
                p as f64 * 0.1 / 25.4
            )
        },
    },
    FunFact {
        threshold: 1000,
        render: |p| {
            format!(
                "{} pages! Laid end to end, that's about {:.1}km of text!",
                group_thousands(p),
                p as f64 * 0.24 / 1000.0
            )
        },
    },
    FunFact {
        threshold: 3000,
        render: |p| {
            format!(
                "{} pages: the entire Lord of the Rings {:.1} times over!",
                group_thousands(p),
                p as f64 / 1178.0
            )
        },
    },
    FunFact {
        threshold: 5000,
        render: |p| {
            format!(
                "{} pages! That's Mount Everest {:.4} times over in paper height... you'll get there!",
                group_thousands(p),
                p as f64 * 0.1 / 8_849_000.0
            )
        },
    },
    FunFact {
        threshold: 8000,
        render: |p| {
            format!(
                "{} pages of pure literary adventure. You're a reading machine!",
                group_thousands(p)
            )
        },
    },
    FunFact {
        threshold: 10000,
        render: |p| {
            format!(
                "{} pages! You've entered the 10K club. That's legendary.",
                group_thousands(p)
            )
        },
    },
];

/// The rung that applies to `total_pages`: the last one whose threshold is met.
pub fn select(total_pages: u64) -> &'static FunFact {
    FUN_FACTS
        .iter()
        .filter(|fact| total_pages >= fact.threshold)
        .last()
        .unwrap_or(&FUN_FACTS[0])
}

/// The fun fact message for a page count.
pub fn fun_fact(total_pages: u64) -> String {
    select(total_pages).render(total_pages)
}

/// Format a number with `,` between thousands.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
