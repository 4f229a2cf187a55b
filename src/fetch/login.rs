// src/fetch/login.rs

use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// The fields a browser would submit with the login form: every named
/// `input`, except checkboxes, with its current value.
pub fn form_fields(html: &str) -> BTreeMap<String, String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("form input").expect("form input selector should parse");

    doc.select(&sel)
        .filter(|el| el.value().attr("type") != Some("checkbox"))
        .filter_map(|el| {
            let name = el.value().attr("name")?;
            let value = el.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Whether a page still asks for a password, i.e. the login did not stick.
pub fn looks_like_login(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(r#"form input[type="password"]"#)
        .expect("password input selector should parse");
    doc.select(&sel).next().is_some()
}
