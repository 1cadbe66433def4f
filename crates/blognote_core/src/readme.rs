//! README marker-block regeneration.
//!
//! A block is delimited by `<!-- Key Start -->` and `<!-- Key End -->` lines;
//! everything between them is replaced with generated lines. Keys are matched
//! case-insensitively against the provided sections.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<!--\s+(\S+)\s+(Start|End)\s+-->$").expect("valid marker regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Start,
    End,
}

fn parse_marker(line: &str) -> Option<(&str, MarkerKind)> {
    let caps = MARKER_RE.captures(line.trim())?;
    let key = caps.get(1)?.as_str();
    let kind = match caps.get(2)?.as_str() {
        "Start" => MarkerKind::Start,
        _ => MarkerKind::End,
    };
    Some((key, kind))
}

/// Replaces the body of every known marker block.
///
/// `sections` is keyed by lowercase marker key. Blocks with an unknown key or
/// without a matching end marker are left untouched.
pub fn replace_marker_blocks(text: &str, sections: &BTreeMap<String, Vec<String>>) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        output.push(line.to_string());
        index += 1;

        let Some((key, MarkerKind::Start)) = parse_marker(line) else {
            continue;
        };
        let Some(replacement) = sections.get(&key.to_lowercase()) else {
            warn!("event=readme_markers module=readme status=skip reason=unknown_key key={key}");
            continue;
        };
        let end = lines[index..]
            .iter()
            .position(|candidate| parse_marker(candidate) == Some((key, MarkerKind::End)));
        let Some(offset) = end else {
            warn!("event=readme_markers module=readme status=skip reason=unterminated key={key}");
            continue;
        };

        output.extend(replacement.iter().cloned());
        output.push(format!("<!-- {key} End -->"));
        index += offset + 1;
    }

    output.join("\n")
}
