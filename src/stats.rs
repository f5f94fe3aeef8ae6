//! Aggregate statistics
//!
//! Summarizes how the lifespan splits across categories: week counts,
//! year equivalents and share of the lifespan. Statistics are computed from
//! the normal-mode week counts regardless of the active display mode.

use std::collections::BTreeMap;

use crate::allocation::WeekCounts;
use crate::types::{Category, CategoryStat, CategoryStats, Insight, LifeParameters, WEEKS_PER_YEAR};

/// Categories compared for the "more time in X than in Y" insight, in the
/// order used to break ties
pub const INSIGHT_CATEGORIES: [Category; 6] = [
    Category::Sleep,
    Category::Work,
    Category::Family,
    Category::Travel,
    Category::Leisure,
    Category::Sports,
];

/// Compute statistics for the given parameters and elapsed weeks
pub fn aggregate(params: &LifeParameters, lived_weeks: i64) -> CategoryStats {
    let counts = WeekCounts::from_parameters(params);
    aggregate_counts(&counts, params.total_weeks(), lived_weeks)
}

/// Compute statistics from precomputed week counts
pub fn aggregate_counts(counts: &WeekCounts, total_weeks: usize, lived_weeks: i64) -> CategoryStats {
    let total = i64::try_from(total_weeks).unwrap_or(i64::MAX);
    let remaining = total.saturating_sub(lived_weeks);

    let mut categories: BTreeMap<Category, CategoryStat> = counts
        .in_fill_order()
        .map(|(category, weeks)| {
            let weeks = i64::try_from(weeks).unwrap_or(i64::MAX);
            (category, category_stat(weeks, total))
        })
        .collect();

    categories.insert(Category::Lived, category_stat(lived_weeks, total));
    categories.insert(Category::Future, category_stat(remaining, total));

    CategoryStats {
        total_weeks: total,
        lived_weeks,
        remaining_weeks: remaining,
        categories,
    }
}

/// Pick the comparison shown as the single insight.
///
/// Ranks the insight categories by week count, highest first, keeping the
/// enumeration order among equals. Reports the first adjacent pair with a
/// strict drop; when every count is equal, reports the top two.
pub fn rank_insight(stats: &CategoryStats) -> Insight {
    let mut ranked: Vec<(Category, i64)> = INSIGHT_CATEGORIES
        .iter()
        .map(|&c| (c, stats.weeks_for(c)))
        .collect();
    // stable: ties keep enumeration order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .windows(2)
        .find(|pair| pair[0].1 > pair[1].1)
        .map(|pair| Insight {
            higher: pair[0].0,
            lower: pair[1].0,
        })
        .unwrap_or(Insight {
            higher: ranked[0].0,
            lower: ranked[1].0,
        })
}

fn category_stat(weeks: i64, total_weeks: i64) -> CategoryStat {
    CategoryStat {
        week_count: weeks,
        year_equivalent: weeks as f64 / WEEKS_PER_YEAR as f64,
        percentage_of_lifespan: percentage(weeks, total_weeks),
    }
}

fn percentage(weeks: i64, total_weeks: i64) -> f64 {
    if total_weeks <= 0 {
        return 0.0;
    }
    weeks as f64 / total_weeks as f64 * 100.0
}
