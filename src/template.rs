//! `{column}` placeholder substitution for message templates.

use crate::contacts::Record;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// Renders `template` for one contact.
///
/// Each `{name}` whose `name` is a column of `record` is replaced by that
/// cell's text (an empty cell yields an empty string). Tokens naming no
/// column are left exactly as written, braces included.
pub fn render(template: &str, record: &Record) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match record.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of all placeholders used in `template`, in order of first use.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Placeholders in `template` that none of `columns` will fill.
pub fn unknown_placeholders<'a>(template: &'a str, columns: &[String]) -> Vec<&'a str> {
    placeholders(template)
        .into_iter()
        .filter(|name| !columns.iter().any(|c| c == name))
        .collect()
}
