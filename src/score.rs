// src/score.rs
//! Rotisserie scoring.
//!
//! In every category each team earns points equal to its ordinal rank,
//! 1 for the worst value up to `n` for the best. Tied teams split the points
//! of the positions they share, so every category hands out exactly
//! `n(n+1)/2` points. A team's score is the sum of its points.

use tracing::{debug, warn};

use crate::table::{CombinedStats, RankTable};

/// Rank every category of `stats`, flip the ones in `lower_is_better`, total
/// them, and order teams by total (best first).
///
/// Teams with equal totals keep their input order. Labels in
/// `lower_is_better` that `stats` does not carry are ignored.
pub fn score(stats: &CombinedStats, lower_is_better: &[&str]) -> RankTable {
    let n = stats.len();

    for missing in lower_is_better
        .iter()
        .filter(|c| stats.category_index(c).is_none())
    {
        warn!(category = %missing, "lower-is-better category not in stats");
    }

    // column-major while ranking, one Vec per category
    let columns: Vec<Vec<f64>> = stats
        .categories()
        .iter()
        .enumerate()
        .map(|(j, category)| {
            let ranks = average_ranks(&stats.column(j));
            if lower_is_better.contains(&category.as_str()) {
                invert(&ranks)
            } else {
                ranks
            }
        })
        .collect();

    let by_team: Vec<Vec<f64>> = (0..n)
        .map(|i| columns.iter().map(|col| col[i]).collect())
        .collect();
    let totals: Vec<f64> = by_team.iter().map(|r| r.iter().sum()).collect();

    let mut order: Vec<usize> = (0..n).collect();
    // stable: equal totals keep input order
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

    debug!(teams = n, categories = columns.len(), "scored");

    RankTable::from_parts(
        order.iter().map(|&i| stats.teams()[i].clone()).collect(),
        stats.categories().to_vec(),
        order.iter().map(|&i| by_team[i].clone()).collect(),
        order.iter().map(|&i| totals[i]).collect(),
    )
}

/// 1-based ascending ranks, ties sharing the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < idx.len() {
        let mut end = start + 1;
        while end < idx.len() && values[idx[end]] == values[idx[start]] {
            end += 1;
        }
        // positions start+1 ..= end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &i in &idx[start..end] {
            ranks[i] = shared;
        }
        start = end;
    }
    ranks
}

/// `n + 1 - rank`, for categories where the smallest value wins.
pub fn invert(ranks: &[f64]) -> Vec<f64> {
    let top = ranks.len() as f64 + 1.0;
    ranks.iter().map(|r| top - r).collect()
}
