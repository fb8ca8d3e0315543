//! Derived metrics computed from reaction sets
//!
//! Everything here is a pure function of a [`ContentItem`] (or of two
//! timestamps). Nothing is cached on the entity.

use crate::ContentItem;
use std::fmt;

/// Length of one day in milliseconds
pub const DAY_MS: u64 = 86_400_000;

/// Cardinalities of the reaction sets of one content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngagementCounts {
    /// Distinct viewers
    pub view_count: usize,
    /// Distinct likers
    pub like_count: usize,
    /// Distinct dislikers
    pub dislike_count: usize,
}

/// Human-facing age of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyLabel {
    /// Less than one day old (or timestamp in the future)
    Today,
    /// Between one and two days old
    Yesterday,
    /// Two or more whole days old
    DaysAgo(u64),
}

impl fmt::Display for RecencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecencyLabel::Today => f.write_str("Today"),
            RecencyLabel::Yesterday => f.write_str("Yesterday"),
            RecencyLabel::DaysAgo(days) => write!(f, "{} days ago", days),
        }
    }
}

/// Count views, likes and dislikes
pub fn counts(content: &ContentItem) -> EngagementCounts {
    EngagementCounts {
        view_count: content.views().len(),
        like_count: content.likes().len(),
        dislike_count: content.dislikes().len(),
    }
}

/// Share of likes among likes + dislikes, in percent
///
/// Returns `None` when nobody has liked or disliked the item.
pub fn like_percentage(content: &ContentItem) -> Option<f64> {
    share(content.likes().len(), content.dislikes().len())
}

/// Share of dislikes among likes + dislikes, in percent
///
/// Returns `None` when nobody has liked or disliked the item.
pub fn dislike_percentage(content: &ContentItem) -> Option<f64> {
    share(content.dislikes().len(), content.likes().len())
}

fn share(part: usize, rest: usize) -> Option<f64> {
    let total = part + rest;
    if total == 0 {
        return None;
    }
    Some(part as f64 / total as f64 * 100.0)
}

/// Label the age of something created at `created_at`, as seen at `now`
///
/// Both timestamps are milliseconds since the Unix epoch. Whole days are
/// counted with a fixed [`DAY_MS`] unit; a `created_at` after `now` is
/// treated as `Today`.
pub fn recency_label(created_at: u64, now: u64) -> RecencyLabel {
    match now.saturating_sub(created_at) / DAY_MS {
        0 => RecencyLabel::Today,
        1 => RecencyLabel::Yesterday,
        days => RecencyLabel::DaysAgo(days),
    }
}

/// Render an optional percentage as `"62.5%"`, or `"n/a"` when undefined
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(pct) if pct.fract() == 0.0 => format!("{:.0}%", pct),
        Some(pct) => format!("{:.1}%", pct),
        None => "n/a".to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{AccountId, ContentId, ReactionKind};
    use proptest::prelude::*;

    proptest! {
        /// Property: percentages are finite, in range, and sum to 100
        #[test]
        fn test_percentages_are_complementary(likes in 0u128..40, dislikes in 0u128..40) {
            let mut item = ContentItem::new(ContentId::from_value(1), AccountId::from_value(0), "p", 0);
            for i in 0..likes {
                item.add_reaction(AccountId::from_value(i + 1), ReactionKind::Like);
            }
            for i in 0..dislikes {
                item.add_reaction(AccountId::from_value(1000 + i), ReactionKind::Dislike);
            }

            match (like_percentage(&item), dislike_percentage(&item)) {
                (None, None) => prop_assert_eq!(likes + dislikes, 0),
                (Some(l), Some(d)) => {
                    prop_assert!(l.is_finite() && d.is_finite());
                    prop_assert!((0.0..=100.0).contains(&l));
                    prop_assert!((l + d - 100.0).abs() < 1e-9);
                }
                other => prop_assert!(false, "inconsistent percentages: {:?}", other),
            }
        }

        /// Property: labels never go negative and track whole days
        #[test]
        fn test_recency_matches_whole_days(created in 0u64..4_000_000_000_000, offset in 0u64..1_000_000_000_000) {
            let label = recency_label(created, created + offset);
            let days = offset / DAY_MS;
            let expected = match days {
                0 => RecencyLabel::Today,
                1 => RecencyLabel::Yesterday,
                n => RecencyLabel::DaysAgo(n),
            };
            prop_assert_eq!(label, expected);
        }
    }
}
