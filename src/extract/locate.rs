// src/extract/locate.rs

use tracing::debug;

use super::rows::Row;

/// Row index of the hitting header on the standings page.
pub const HITTING_OFFSET: usize = 3;

/// Row index of the pitching header when the page has `team_count` teams:
/// the hitting header, its data rows, then another `HITTING_OFFSET` rows of
/// preamble before the pitching header.
pub fn pitching_offset(team_count: usize) -> usize {
    (2 * HITTING_OFFSET + 1).saturating_add(team_count)
}

/// How header rows are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStrategy {
    /// Search for a row whose category cells are all known labels. A header
    /// that cannot be found this way is taken from its fixed offset instead.
    #[default]
    ByContent,
    /// Fixed offsets only, derived from the team count.
    ByOffset,
}

/// Where each header row was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRows {
    pub hitting: usize,
    pub pitching: usize,
}

/// True when the row has one cell per label after the team column, each of
/// them one of `labels`.
pub fn is_header(row: &Row, labels: &[&str]) -> bool {
    row.cells.len() == labels.len() + 1
        && row.cells[1..].iter().all(|c| labels.contains(&c.as_str()))
}

pub fn locate(
    rows: &[Row],
    team_count: usize,
    strategy: HeaderStrategy,
    hitting_labels: &[&str],
    pitching_labels: &[&str],
) -> HeaderRows {
    let by_offset = HeaderRows {
        hitting: HITTING_OFFSET,
        pitching: pitching_offset(team_count),
    };
    if strategy == HeaderStrategy::ByOffset {
        return by_offset;
    }

    let hitting = match rows.iter().position(|r| is_header(r, hitting_labels)) {
        Some(i) => i,
        None => {
            debug!(row = by_offset.hitting, "hitting header not matched, using offset");
            by_offset.hitting
        }
    };

    let pitching = match rows
        .iter()
        .enumerate()
        .skip(hitting + 1)
        .find(|(_, r)| is_header(r, pitching_labels))
    {
        Some((i, _)) => i,
        None => {
            // same spacing as the fixed layout, anchored on the hitting header
            let fallback = hitting
                .saturating_add(team_count)
                .saturating_add(1 + HITTING_OFFSET);
            debug!(row = fallback, "pitching header not matched, using offset");
            fallback
        }
    };

    HeaderRows { hitting, pitching }
}
