// src/table.rs

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{Result, RotoError};

/// A team-by-category grid of raw stats.
///
/// Rows are labelled by team name (unique), columns by category code.
#[derive(Debug, Clone, PartialEq)]
pub struct StatTable {
    teams: Vec<String>,
    categories: Vec<String>,
    values: Vec<Vec<f64>>,
}

/// Hitting and pitching joined side by side on team.
pub type CombinedStats = StatTable;

impl StatTable {
    /// Build a table, checking shape and team-name uniqueness.
    /// `table` names the sub-table in error messages.
    pub fn new(
        table: &'static str,
        teams: Vec<String>,
        categories: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if teams.len() != values.len() {
            return Err(RotoError::LayoutMismatch(format!(
                "{} table has {} team labels but {} value rows",
                table,
                teams.len(),
                values.len()
            )));
        }
        if let Some((i, row)) = values
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != categories.len())
        {
            return Err(RotoError::LayoutMismatch(format!(
                "{} row for {:?} has {} values for {} categories",
                table,
                teams[i],
                row.len(),
                categories.len()
            )));
        }

        let mut seen = HashSet::with_capacity(teams.len());
        for team in &teams {
            if !seen.insert(team.as_str()) {
                return Err(RotoError::DuplicateTeamLabel {
                    table,
                    team: team.clone(),
                });
            }
        }

        Ok(Self {
            teams,
            categories,
            values,
        })
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i]
    }

    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// One category's values, in team order.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[j]).collect()
    }

    pub fn value(&self, team: &str, category: &str) -> Option<f64> {
        let i = self.teams.iter().position(|t| t == team)?;
        let j = self.category_index(category)?;
        Some(self.values[i][j])
    }

    /// Join `other`'s columns onto this table.
    ///
    /// Both tables must list exactly the same teams in the same order; rows
    /// are matched by position, so any divergence is a layout error rather
    /// than a silent misalignment.
    pub fn concat(self, other: StatTable) -> Result<StatTable> {
        if self.teams != other.teams {
            let mine: HashSet<&String> = self.teams.iter().collect();
            let theirs: HashSet<&String> = other.teams.iter().collect();
            let detail = if mine == theirs {
                "same teams listed in a different order".to_string()
            } else {
                let mut missing: Vec<&str> = mine
                    .symmetric_difference(&theirs)
                    .map(|t| t.as_str())
                    .collect();
                missing.sort_unstable();
                format!("teams not in both tables: {}", missing.join(", "))
            };
            return Err(RotoError::LayoutMismatch(format!(
                "hitting and pitching team labels disagree ({})",
                detail
            )));
        }
        if let Some(dup) = other
            .categories
            .iter()
            .find(|c| self.categories.contains(c))
        {
            return Err(RotoError::LayoutMismatch(format!(
                "category {:?} appears in both tables",
                dup
            )));
        }

        let mut categories = self.categories;
        categories.extend(other.categories);
        let values = self
            .values
            .into_iter()
            .zip(other.values)
            .map(|(mut left, right)| {
                left.extend(right);
                left
            })
            .collect();

        Ok(StatTable {
            teams: self.teams,
            categories,
            values,
        })
    }
}

/// Per-category rotisserie points plus a total, best team first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    teams: Vec<String>,
    categories: Vec<String>,
    ranks: Vec<Vec<f64>>,
    totals: Vec<f64>,
}

/// One row of a [`RankTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedTeam<'a> {
    pub team: &'a str,
    pub ranks: &'a [f64],
    pub total: f64,
}

impl RankTable {
    pub(crate) fn from_parts(
        teams: Vec<String>,
        categories: Vec<String>,
        ranks: Vec<Vec<f64>>,
        totals: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(teams.len(), ranks.len());
        debug_assert_eq!(teams.len(), totals.len());
        Self {
            teams,
            categories,
            ranks,
            totals,
        }
    }

    /// Teams in report order.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    pub fn rows(&self) -> impl Iterator<Item = RankedTeam<'_>> + '_ {
        self.teams
            .iter()
            .zip(&self.ranks)
            .zip(&self.totals)
            .map(|((team, ranks), &total)| RankedTeam {
                team,
                ranks,
                total,
            })
    }

    /// One category's points in report order.
    pub fn column(&self, category: &str) -> Option<Vec<f64>> {
        let j = self.categories.iter().position(|c| c == category)?;
        Some(self.ranks.iter().map(|row| row[j]).collect())
    }

    pub fn rank(&self, team: &str, category: &str) -> Option<f64> {
        let i = self.teams.iter().position(|t| t == team)?;
        let j = self.categories.iter().position(|c| c == category)?;
        Some(self.ranks[i][j])
    }

    pub fn total(&self, team: &str) -> Option<f64> {
        let i = self.teams.iter().position(|t| t == team)?;
        Some(self.totals[i])
    }

    /// The scores-only projection fed to the history file.
    pub fn scores(&self) -> Vec<(&str, f64)> {
        self.teams
            .iter()
            .map(String::as_str)
            .zip(self.totals.iter().copied())
            .collect()
    }
}
