// src/report/index.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{fs, path::Path, path::PathBuf};
use tracing::{info, warn};

pub const TEMPLATE: &str = "index_orig.html";
pub const PAGE: &str = "index.html";
const MARKER: &str = "Statistics updated on ";

/// Stamp `date` after the "updated on" marker of `index_orig.html` and write
/// the result to `index.html` in the same directory.
///
/// Returns `None` when there is no template to stamp.
pub fn stamp_index(index_dir: &Path, date: NaiveDate) -> Result<Option<PathBuf>> {
    let template = index_dir.join(TEMPLATE);
    if !template.exists() {
        warn!(path = %template.display(), "no index template; skipping");
        return Ok(None);
    }

    let html = fs::read_to_string(&template)
        .with_context(|| format!("reading {}", template.display()))?;
    let stamped = html.replace(
        MARKER,
        &format!("{}{}", MARKER, date.format("%Y-%m-%d")),
    );

    let page = index_dir.join(PAGE);
    fs::write(&page, stamped).with_context(|| format!("writing {}", page.display()))?;
    info!(path = %page.display(), "stamped index page");
    Ok(Some(page))
}
