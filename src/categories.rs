// src/categories.rs

/// Hitting categories in report order.
pub const HITTING: [&str; 8] = ["BA", "OBP", "R", "SB", "RBI", "HR", "TB", "SLG"];

/// Pitching categories in report order.
pub const PITCHING: [&str; 8] = ["ERA", "WHIP", "INNdGS", "W", "K", "K/BB", "HD", "S"];

/// Categories where the smaller raw value wins.
pub const LOWER_IS_BETTER: [&str; 2] = ["ERA", "WHIP"];

/// Counting stats, rendered as integers in the stats snapshot.
pub const COUNTING: [&str; 9] = ["R", "SB", "RBI", "HR", "TB", "W", "K", "HD", "S"];

/// Columns per sub-table.
pub const PER_TABLE: usize = 8;

/// Hitting then pitching: the column order of every report.
pub fn report_order() -> Vec<&'static str> {
    HITTING.iter().chain(PITCHING.iter()).copied().collect()
}

pub fn is_counting(label: &str) -> bool {
    COUNTING.contains(&label)
}
