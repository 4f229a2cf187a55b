//! Rotisserie standings for a CBS fantasy baseball league.
//!
//! The season-to-date team totals page is reduced to a team-by-category stat
//! table ([`extract`]), turned into rotisserie points ([`score`]), and written
//! out as CSV snapshots and a score history.

pub mod categories;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod report;
pub mod score;
pub mod storage;
pub mod table;

pub use error::RotoError;
pub use extract::{extract, extract_with, HeaderStrategy};
pub use score::score;
pub use table::{CombinedStats, RankTable, RankedTeam, StatTable};
