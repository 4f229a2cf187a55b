// src/error.rs

use thiserror::Error;

/// Failures raised by the extraction and scoring core.
///
/// None of these are recoverable locally: a document that trips any of them
/// produces no table at all.
#[derive(Debug, Error, PartialEq)]
pub enum RotoError {
    #[error("cell {column} of row {row} is not a finite number: {text:?}")]
    Parse {
        row: usize,
        column: usize,
        text: String,
    },

    #[error("no {table} header row found")]
    MissingHeader { table: &'static str },

    #[error("{table} header has {found} categories, expected {expected}")]
    MalformedHeader {
        table: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("layout mismatch: {0}")]
    LayoutMismatch(String),

    #[error("team {team:?} appears more than once in the {table} table")]
    DuplicateTeamLabel { table: &'static str, team: String },
}

pub type Result<T> = std::result::Result<T, RotoError>;
