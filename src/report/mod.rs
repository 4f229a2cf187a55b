// src/report/mod.rs
//! Dated and "latest" CSV snapshots of the ranks and the raw stats.

pub mod index;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::categories::{is_counting, report_order};
use crate::table::{CombinedStats, RankTable};

pub const RANKS_STEM: &str = "roto_ranks";
pub const STATS_STEM: &str = "roto_stats";

/// Writes `<stem>_<date>.csv` and `<stem>.csv` side by side.
pub struct ReportWriter {
    csv_dir: PathBuf,
    date: NaiveDate,
}

impl ReportWriter {
    pub fn new(csv_dir: impl Into<PathBuf>, date: NaiveDate) -> Result<Self> {
        let csv_dir = csv_dir.into();
        fs::create_dir_all(&csv_dir)
            .with_context(|| format!("creating report directory {:?}", &csv_dir))?;
        Ok(Self { csv_dir, date })
    }

    /// Ranks in report order, with a trailing `scores` column.
    /// Returns the path of the undated copy.
    pub fn write_ranks(&self, ranks: &RankTable) -> Result<PathBuf> {
        let order = column_order(ranks.categories());

        let mut header = vec!["team".to_string()];
        header.extend(order.iter().map(|&j| ranks.categories()[j].clone()));
        header.push("scores".to_string());

        let rows = ranks
            .rows()
            .map(|row| {
                let mut out = vec![row.team.to_string()];
                out.extend(order.iter().map(|&j| points_cell(row.ranks[j])));
                out.push(points_cell(row.total));
                out
            })
            .collect();

        self.write_both(RANKS_STEM, header, rows)
    }

    /// Raw stats in extraction order; counting stats as whole numbers.
    pub fn write_stats(&self, stats: &CombinedStats) -> Result<PathBuf> {
        let order = column_order(stats.categories());

        let mut header = vec!["team".to_string()];
        header.extend(order.iter().map(|&j| stats.categories()[j].clone()));

        let rows = stats
            .teams()
            .iter()
            .enumerate()
            .map(|(i, team)| {
                let mut out = vec![team.clone()];
                out.extend(order.iter().map(|&j| {
                    stat_cell(&stats.categories()[j], stats.row(i)[j])
                }));
                out
            })
            .collect();

        self.write_both(STATS_STEM, header, rows)
    }

    fn write_both(
        &self,
        stem: &str,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<PathBuf> {
        let dated = dated_path(&self.csv_dir, stem, self.date);
        let latest = self.csv_dir.join(format!("{}.csv", stem));
        for path in [&dated, &latest] {
            write_csv(path, &header, &rows)?;
        }
        info!(path = %latest.display(), rows = rows.len(), "wrote report");
        Ok(latest)
    }
}

/// `<dir>/<stem>_<YYYY-MM-DD>.csv`
pub fn dated_path(dir: &Path, stem: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_{}.csv", stem, date.format("%Y-%m-%d")))
}

pub(crate) fn write_csv(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Column indices in hitting-then-pitching report order, or the table's own
/// order when it does not carry every standard category.
pub fn column_order(categories: &[String]) -> Vec<usize> {
    let canonical: Option<Vec<usize>> = report_order()
        .iter()
        .map(|label| categories.iter().position(|c| c == label))
        .collect();
    match canonical {
        Some(order) if order.len() == categories.len() => order,
        _ => (0..categories.len()).collect(),
    }
}

/// Points always carry a decimal: `4.0`, `3.5`.
pub fn points_cell(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

fn stat_cell(category: &str, v: f64) -> String {
    if is_counting(category) {
        (v.trunc() as i64).to_string()
    } else {
        v.to_string()
    }
}
