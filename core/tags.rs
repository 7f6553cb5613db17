use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::BracketStyle;

static ASCII_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("literal pattern compiles"));
static FULL_WIDTH_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"（([^）]+)）").expect("literal pattern compiles"));
static ANY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[（(]([^）)]+?)[）)]").expect("literal pattern compiles"));

fn pattern_for(style: BracketStyle) -> &'static Regex {
    match style {
        BracketStyle::Ascii => &ASCII_BRACKETS,
        BracketStyle::FullWidth => &FULL_WIDTH_BRACKETS,
        BracketStyle::Both => &ANY_BRACKETS,
    }
}

/// Collects the tags of the first bracketed segment in `filename`.
///
/// The segment text is split on ASCII or full-width commas; pieces are
/// trimmed and empty pieces dropped. Filenames without a bracketed segment
/// yield an empty set.
pub fn extract_tags(filename: &str, style: BracketStyle) -> HashSet<String> {
    let Some(caps) = pattern_for(style).captures(filename) else {
        return HashSet::new();
    };
    caps[1]
        .split([',', '，'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Removes the first bracketed segment from `filename` and trims the rest.
/// Filenames without a segment come back unchanged apart from trimming.
pub fn strip_tags(filename: &str, style: BracketStyle) -> String {
    pattern_for(style)
        .replace(filename, "")
        .trim()
        .to_string()
}
