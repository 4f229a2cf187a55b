// src/history/mod.rs
//! Season time series of total scores: one row per reporting day, one
//! column per team.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::report::{dated_path, points_cell, write_csv};
use crate::table::RankTable;

pub const SERIES_STEM: &str = "time_series";
const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreHistory {
    teams: Vec<String>,
    rows: Vec<(NaiveDate, Vec<Option<f64>>)>,
}

impl ScoreHistory {
    /// Load a history file; a missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;

        // first header cell names the date column, whatever it says
        let teams: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .iter()
            .skip(1)
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("reading {}", path.display()))?;
            let raw_date = record
                .get(0)
                .ok_or_else(|| anyhow!("empty row {} in {}", line + 2, path.display()))?;
            // tolerate a time suffix on the date
            let day = raw_date.split_whitespace().next().unwrap_or_default();
            let date = NaiveDate::parse_from_str(day, DATE_FMT)
                .with_context(|| format!("bad date {:?} in {}", raw_date, path.display()))?;

            let scores = (0..teams.len())
                .map(|j| match record.get(j + 1).map(str::trim) {
                    None | Some("") => Ok(None),
                    Some(v) => v
                        .parse::<f64>()
                        .map(Some)
                        .with_context(|| format!("bad score {:?} on {}", v, day)),
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push((date, scores));
        }

        Ok(Self { teams, rows })
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|(d, _)| *d)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.rows.iter().any(|(d, _)| *d == date)
    }

    pub fn score(&self, date: NaiveDate, team: &str) -> Option<f64> {
        let j = self.teams.iter().position(|t| t == team)?;
        let (_, scores) = self.rows.iter().find(|(d, _)| *d == date)?;
        scores[j]
    }

    /// Append one day of scores. New teams become new columns, blank on
    /// earlier days. Returns false, leaving the history untouched, if the
    /// date is already recorded.
    pub fn append(&mut self, date: NaiveDate, scores: &[(&str, f64)]) -> bool {
        if self.contains(date) {
            return false;
        }
        for (team, _) in scores {
            if !self.teams.iter().any(|t| t == team) {
                self.teams.push(team.to_string());
                for (_, row) in &mut self.rows {
                    row.push(None);
                }
            }
        }

        let mut row = vec![None; self.teams.len()];
        for (team, total) in scores {
            if let Some(j) = self.teams.iter().position(|t| t == team) {
                row[j] = Some(*total);
            }
        }
        self.rows.push((date, row));
        true
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut header = vec!["date".to_string()];
        header.extend(self.teams.iter().cloned());
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|(date, scores)| {
                let mut out = vec![date.format(DATE_FMT).to_string()];
                out.extend(scores.iter().map(|s| s.map(points_cell).unwrap_or_default()));
                out
            })
            .collect();
        write_csv(path, &header, &rows)
    }
}

/// Merge today's totals into `time_series.csv` under `csv_dir`, also writing
/// a dated copy. Returns the path of the undated file.
pub fn update_history(csv_dir: &Path, date: NaiveDate, ranks: &RankTable) -> Result<PathBuf> {
    fs::create_dir_all(csv_dir)
        .with_context(|| format!("creating history directory {:?}", csv_dir))?;
    let latest = csv_dir.join(format!("{}.csv", SERIES_STEM));

    let mut history = ScoreHistory::load(&latest)?;
    if history.append(date, &ranks.scores()) {
        info!(%date, days = history.rows.len(), "added scores to history");
    } else {
        info!(%date, "date already in history; not adding");
    }

    history.save(&dated_path(csv_dir, SERIES_STEM, date))?;
    history.save(&latest)?;
    Ok(latest)
}
