// src/extract/mod.rs
//! Pulls the hitting and pitching tables out of the season-to-date team
//! totals page.
//!
//! Extraction is two-phase: the document is first flattened into rows of
//! cell text, then each sub-table is read from the `team_count` rows below its
//! header. Whatever the header location strategy, each sub-table must yield
//! exactly `team_count` uniquely named teams, and both sub-tables must list
//! them in the same order.

pub mod locate;
pub mod rows;

pub use locate::{HeaderRows, HeaderStrategy};
pub use rows::Row;

use tracing::debug;

use crate::categories::{HITTING, PER_TABLE, PITCHING};
use crate::error::{Result, RotoError};
use crate::table::{CombinedStats, StatTable};

/// Extract with the default header strategy.
pub fn extract(document: &str, team_count: usize) -> Result<CombinedStats> {
    extract_with(document, team_count, HeaderStrategy::default())
}

pub fn extract_with(
    document: &str,
    team_count: usize,
    strategy: HeaderStrategy,
) -> Result<CombinedStats> {
    if team_count == 0 {
        return Err(RotoError::LayoutMismatch(
            "team count must be at least 1".to_string(),
        ));
    }

    let rows = rows::flatten(document);
    let headers = locate::locate(&rows, team_count, strategy, &HITTING, &PITCHING);
    debug!(
        rows = rows.len(),
        hitting = headers.hitting,
        pitching = headers.pitching,
        ?strategy,
        "located header rows"
    );

    let hitting = read_section(&rows, headers.hitting, team_count, "hitting")?;
    let pitching = read_section(&rows, headers.pitching, team_count, "pitching")?;
    hitting.concat(pitching)
}

/// Read one sub-table: its header at `header_at` and the data rows below it.
fn read_section(
    rows: &[Row],
    header_at: usize,
    team_count: usize,
    table: &'static str,
) -> Result<StatTable> {
    let header = rows
        .get(header_at)
        .ok_or(RotoError::MissingHeader { table })?;
    let categories: Vec<String> = header.cells.iter().skip(1).cloned().collect();
    if categories.len() != PER_TABLE || categories.iter().any(String::is_empty) {
        return Err(RotoError::MalformedHeader {
            table,
            found: categories.iter().filter(|c| !c.is_empty()).count(),
            expected: PER_TABLE,
        });
    }

    let width = header.cells.len();
    let room = rows.len() - header_at - 1;
    let mut teams = Vec::with_capacity(team_count.min(room));
    let mut values = Vec::with_capacity(team_count.min(room));

    for (offset, row) in rows
        .iter()
        .skip(header_at + 1)
        .take(team_count)
        .enumerate()
    {
        // a short section runs into its separator row or the next header
        if !is_data_row(row, width) {
            break;
        }
        let row_at = header_at + 1 + offset;
        let parsed = row.cells[1..]
            .iter()
            .enumerate()
            .map(|(j, text)| parse_number(text, row_at, j + 1))
            .collect::<Result<Vec<f64>>>()?;
        teams.push(row.cells[0].clone());
        values.push(parsed);
    }

    if teams.len() != team_count {
        return Err(RotoError::LayoutMismatch(format!(
            "{} section has {} team rows, expected {}",
            table,
            teams.len(),
            team_count
        )));
    }
    // a long section means the team count is too small
    if let Some(extra) = rows
        .get(header_at + 1 + team_count)
        .filter(|row| is_data_row(row, width))
    {
        return Err(RotoError::LayoutMismatch(format!(
            "{} section continues past {} team rows (next team {:?})",
            table, team_count, extra.cells[0]
        )));
    }

    debug!(table, teams = teams.len(), "read section");
    StatTable::new(table, teams, categories, values)
}

fn is_data_row(row: &Row, width: usize) -> bool {
    let named = row.first().is_some_and(|t| !t.is_empty());
    named
        && row.cells.len() == width
        && !locate::is_header(row, &HITTING)
        && !locate::is_header(row, &PITCHING)
}

/// Parse a stat cell. Thousands separators are accepted; anything that is
/// not a finite number is an error.
fn parse_number(text: &str, row: usize, column: usize) -> Result<f64> {
    let cleaned: String = text.chars().filter(|&c| c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RotoError::Parse {
            row,
            column,
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Line<'a> = (&'a str, [&'a str; 8]);

    const HIT: [Line<'static>; 3] = [
        ("Aces", [".271", ".340", "410", "55", "398", "101", "1,402", ".455"]),
        ("Bats", [".259", ".322", "388", "72", "371", "88", "1,310", ".431"]),
        ("Cubs", [".265", ".335", "402", "41", "405", "110", "1,377", ".449"]),
    ];

    const PITCH: [Line<'static>; 3] = [
        ("Aces", ["3.71", "1.21", "5.8", "41", "702", "2.95", "33", "29"]),
        ("Bats", ["3.52", "1.18", "6.1", "44", "688", "3.10", "40", "22"]),
        ("Cubs", ["4.05", "1.30", "5.5", "38", "655", "2.71", "28", "35"]),
    ];

    fn tr(cells: &[&str], tag: &str) -> String {
        let inner: String = cells
            .iter()
            .map(|c| format!("<{tag}>{c}</{tag}>"))
            .collect();
        format!("<tr>{inner}</tr>\n")
    }

    fn section(header: &[&str], lines: &[Line<'_>]) -> String {
        let mut cells = vec!["Team"];
        cells.extend_from_slice(header);
        let mut out = tr(&cells, "th");
        for (team, vals) in lines {
            let mut cells = vec![*team];
            cells.extend_from_slice(vals);
            out.push_str(&tr(&cells, "td"));
        }
        out
    }

    /// Lays tables out the way the standings page does: three preamble rows,
    /// hitting, three more rows, pitching, then trailing decoration.
    fn page(hitting_header: &[&str], hitting: &[Line<'_>], pitching: &[Line<'_>]) -> String {
        let mut html = String::from("<html><body><table>\n");
        html.push_str(&tr(&["Team Totals"], "td"));
        html.push_str(&tr(&["Year to date", "Scoring"], "td"));
        html.push_str(&tr(&["Hitting"], "td"));
        html.push_str(&section(hitting_header, hitting));
        html.push_str(&tr(&[""], "td"));
        html.push_str(&tr(&["Totals by period"], "td"));
        html.push_str(&tr(&["Pitching"], "td"));
        html.push_str(&section(&PITCHING, pitching));
        html.push_str(&tr(&["Updated nightly"], "td"));
        html.push_str("</table></body></html>");
        html
    }

    #[test]
    fn test_extract_recovers_labels_and_values() {
        let html = page(&HITTING, &HIT, &PITCH);
        let stats = extract(&html, 3).unwrap();

        assert_eq!(stats.teams(), &["Aces", "Bats", "Cubs"]);
        let expected: Vec<&str> = HITTING.iter().chain(PITCHING.iter()).copied().collect();
        assert_eq!(stats.categories(), expected.as_slice());
        assert_eq!(stats.row(0)[0], 0.271);
        assert_eq!(stats.value("Bats", "TB"), Some(1310.0));
        assert_eq!(stats.value("Cubs", "S"), Some(35.0));
        assert_eq!(stats.value("Aces", "K/BB"), Some(2.95));
    }

    #[test]
    fn test_offset_strategy_reads_fixed_layout() {
        let html = page(&HITTING, &HIT, &PITCH);
        let by_offset = extract_with(&html, 3, HeaderStrategy::ByOffset).unwrap();
        assert_eq!(by_offset, extract(&html, 3).unwrap());
    }

    #[test]
    fn test_unknown_labels_fall_back_to_offsets() {
        let renamed = ["AVG", "OBP", "R", "SB", "RBI", "HR", "TB", "SLG"];
        let html = page(&renamed, &HIT, &PITCH);

        let stats = extract(&html, 3).unwrap();
        assert_eq!(stats.categories()[0], "AVG");
        assert_eq!(stats.value("Aces", "AVG"), Some(0.271));
    }

    #[test]
    fn test_short_section_is_layout_mismatch() {
        let html = page(&HITTING, &HIT[..2], &PITCH);
        match extract(&html, 3) {
            Err(RotoError::LayoutMismatch(msg)) => assert!(msg.contains("hitting")),
            other => panic!("expected layout mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_short_section_by_offset_is_layout_mismatch() {
        let html = page(&HITTING, &HIT[..2], &PITCH);
        let err = extract_with(&html, 3, HeaderStrategy::ByOffset).unwrap_err();
        assert!(matches!(err, RotoError::LayoutMismatch(_)));
    }

    const DOTS_HIT: Line<'static> =
        ("Dots", [".248", ".318", "377", "66", "360", "95", "1,288", ".420"]);
    const DOTS_PITCH: Line<'static> =
        ("Dots", ["3.88", "1.25", "5.9", "40", "671", "2.80", "31", "27"]);

    fn four_team_page() -> String {
        let hit = [HIT[0], HIT[1], HIT[2], DOTS_HIT];
        let pitch = [PITCH[0], PITCH[1], PITCH[2], DOTS_PITCH];
        page(&HITTING, &hit, &pitch)
    }

    #[test]
    fn test_four_team_page_reads_every_team() {
        let stats = extract(&four_team_page(), 4).unwrap();
        assert_eq!(stats.teams(), &["Aces", "Bats", "Cubs", "Dots"]);
        assert_eq!(stats.value("Dots", "S"), Some(27.0));
    }

    #[test]
    fn test_team_count_too_small_is_layout_mismatch() {
        let html = four_team_page();
        for strategy in [HeaderStrategy::ByContent, HeaderStrategy::ByOffset] {
            match extract_with(&html, 3, strategy) {
                Err(RotoError::LayoutMismatch(msg)) => {
                    assert!(msg.contains("hitting") && msg.contains("Dots"), "{}", msg)
                }
                other => panic!("{:?}: expected layout mismatch, got {:?}", strategy, other),
            }
        }
    }

    #[test]
    fn test_team_count_too_large_is_layout_mismatch() {
        let html = page(&HITTING, &HIT, &PITCH);
        for strategy in [HeaderStrategy::ByContent, HeaderStrategy::ByOffset] {
            for team_count in [4, 1_000_000_000_000, usize::MAX - 2, usize::MAX] {
                let err = extract_with(&html, team_count, strategy).unwrap_err();
                assert!(
                    matches!(err, RotoError::LayoutMismatch(_)),
                    "{:?} with {} teams: {:?}",
                    strategy,
                    team_count,
                    err
                );
            }
        }
    }

    #[test]
    fn test_bad_cell_is_parse_error() {
        let mut hit = HIT;
        hit[1].1[3] = "n/a";
        let html = page(&HITTING, &hit, &PITCH);

        assert_eq!(
            extract(&html, 3).unwrap_err(),
            RotoError::Parse {
                row: 5,
                column: 4,
                text: "n/a".into()
            }
        );
    }

    #[test]
    fn test_non_finite_cell_is_parse_error() {
        let mut pitch = PITCH;
        pitch[0].1[0] = "NaN";
        let html = page(&HITTING, &HIT, &pitch);
        assert!(matches!(
            extract(&html, 3).unwrap_err(),
            RotoError::Parse { .. }
        ));
    }

    #[test]
    fn test_duplicate_team_is_rejected() {
        let mut hit = HIT;
        hit[2].0 = "Aces";
        let html = page(&HITTING, &hit, &PITCH);
        assert_eq!(
            extract(&html, 3).unwrap_err(),
            RotoError::DuplicateTeamLabel {
                table: "hitting",
                team: "Aces".into()
            }
        );
    }

    #[test]
    fn test_pitching_order_must_match_hitting() {
        let pitch = [PITCH[1], PITCH[0], PITCH[2]];
        let html = page(&HITTING, &HIT, &pitch);
        assert!(matches!(
            extract(&html, 3).unwrap_err(),
            RotoError::LayoutMismatch(_)
        ));
    }

    #[test]
    fn test_short_header_is_malformed() {
        let html = page(&HITTING[..7], &HIT, &PITCH);
        assert_eq!(
            extract_with(&html, 3, HeaderStrategy::ByOffset).unwrap_err(),
            RotoError::MalformedHeader {
                table: "hitting",
                found: 7,
                expected: 8
            }
        );
    }

    #[test]
    fn test_empty_document_has_no_header() {
        assert_eq!(
            extract("<html></html>", 2).unwrap_err(),
            RotoError::MissingHeader { table: "hitting" }
        );
    }

    #[test]
    fn test_zero_teams_rejected() {
        let html = page(&HITTING, &HIT, &PITCH);
        assert!(matches!(
            extract(&html, 0).unwrap_err(),
            RotoError::LayoutMismatch(_)
        ));
    }
}
