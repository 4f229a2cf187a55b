// src/extract/rows.rs

use scraper::{ElementRef, Html, Selector};

/// A `<tr>` reduced to the whitespace-normalised text of its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn first(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }
}

/// Every table row in the document, in document order.
///
/// Only direct `td`/`th` children count as cells, so a nested table does not
/// leak its cells into the enclosing row.
pub fn flatten(document: &str) -> Vec<Row> {
    let doc = Html::parse_document(document);
    let tr = Selector::parse("tr").expect("tr selector should parse");

    doc.select(&tr)
        .map(|row| Row {
            cells: row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .map(cell_text)
                .collect(),
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
