//! Timeline document reconciliation.
//!
//! # Responsibility
//! - Parse the existing timeline into dated entries.
//! - Merge it with the eligible catalog subset: keep recorded dates, date new
//!   documents with the current day and renumber the list.
//! - Render the regenerated document together with aggregate statistics.
//!
//! # Invariants
//! - Each eligible document appears exactly once in the output.
//! - Carried-over entries keep their recorded date and relative order.
//! - Synthesized entries precede carried-over entries, in catalog order.
//! - Serial numbers count down from the entry count to `1`.
//! - Reconciliation is pure: the caller writes the result, and only after it
//!   was fully assembled.

use crate::catalog::{decode_link, display_name, document_link, Catalog};
use crate::config::TimelineConfig;
use crate::stats::StatsTotals;
use crate::workspace::{DocumentSource, FsResult};
use chrono::NaiveDate;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Date format of timeline headings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^###\s+(\d{4}-\d{2}-\d{2})$").expect("valid timeline date regex")
});
static ENTRY_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^No\.\s*(\d+)\s*:\s*\[(.+)\]\((.+)\)$").expect("valid timeline entry regex")
});

/// Classification of one timeline line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineLine {
    /// `### YYYY-MM-DD` heading with a real calendar date.
    Date(NaiveDate),
    /// `No. <serial>: [<title>](<link>)`.
    Entry {
        serial: u32,
        title: String,
        link: String,
    },
    Other,
}

impl TimelineLine {
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        if let Some(caps) = DATE_LINE_RE.captures(line) {
            return match NaiveDate::parse_from_str(&caps[1], DATE_FORMAT) {
                Ok(date) => Self::Date(date),
                Err(_) => Self::Other,
            };
        }
        if let Some(caps) = ENTRY_LINE_RE.captures(line) {
            let Ok(serial) = caps[1].parse::<u32>() else {
                return Self::Other;
            };
            return Self::Entry {
                serial,
                title: caps[2].trim().to_string(),
                link: caps[3].trim().to_string(),
            };
        }
        Self::Other
    }
}

/// One dated document of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    /// Catalog document id, e.g. `HTML/Web Worker`.
    pub path: String,
    pub display_name: String,
}

impl TimelineEntry {
    /// Builds an entry for a newly tracked document.
    pub fn synthesize(path: &str, date: NaiveDate) -> Self {
        Self {
            date,
            path: path.to_string(),
            display_name: display_name(path).to_string(),
        }
    }
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Final entries in display order (newest first).
    pub entries: Vec<TimelineEntry>,
    pub carried_over: usize,
    pub synthesized: usize,
    pub totals: StatsTotals,
    /// Full regenerated document text.
    pub content: String,
}

/// Parses the dated entries of an existing timeline document.
///
/// Entries inherit the most recent date heading above them; entries with no
/// heading above them and malformed lines are skipped.
pub fn parse_timeline(text: &str) -> Vec<TimelineEntry> {
    let mut current_date = None;
    let mut entries = Vec::new();

    for line in text.lines() {
        match TimelineLine::classify(line) {
            TimelineLine::Date(date) => current_date = Some(date),
            TimelineLine::Entry { title, link, .. } => match current_date {
                Some(date) => entries.push(TimelineEntry {
                    date,
                    path: decode_link(&link),
                    display_name: title,
                }),
                None => debug!(
                    "event=timeline_parse module=timeline status=skip reason=undated link={link}"
                ),
            },
            TimelineLine::Other => {}
        }
    }

    entries
}

/// Regenerates the timeline from the catalog and the existing document.
///
/// # Errors
/// - Returns the first document read failure; nothing is rendered then.
pub fn reconcile<S>(
    catalog: &Catalog,
    settings: &TimelineConfig,
    existing: &str,
    source: &S,
    today: NaiveDate,
) -> FsResult<Reconciliation>
where
    S: DocumentSource + ?Sized,
{
    let eligible = catalog.eligible(&settings.groups, &settings.exclude);
    let mut pending: HashSet<&str> = eligible.iter().copied().collect();

    let mut carried = Vec::new();
    for entry in parse_timeline(existing) {
        if pending.remove(entry.path.as_str()) {
            carried.push(entry);
        }
    }

    let mut entries: Vec<TimelineEntry> = eligible
        .iter()
        .filter(|path| pending.contains(*path))
        .map(|path| TimelineEntry::synthesize(path, today))
        .collect();
    let synthesized = entries.len();
    let carried_over = carried.len();
    entries.extend(carried);

    let mut totals = StatsTotals::default();
    for entry in &entries {
        let text = source.read_document(&entry.path)?;
        totals.add_text(&text);
    }

    let content = render_timeline(&settings.title, &entries, &totals);
    info!(
        "event=timeline_reconcile module=timeline status=ok entries={} carried_over={} synthesized={} today={}",
        entries.len(),
        carried_over,
        synthesized,
        today.format(DATE_FORMAT)
    );

    Ok(Reconciliation {
        entries,
        carried_over,
        synthesized,
        totals,
        content,
    })
}

/// Serializes entries into timeline document text.
pub fn render_timeline(title: &str, entries: &[TimelineEntry], totals: &StatsTotals) -> String {
    let mut lines = vec![
        format!("# {title}"),
        String::new(),
        totals.summary(),
        String::new(),
    ];
    let count = entries.len();
    for (index, entry) in entries.iter().enumerate() {
        lines.push(format!("### {}", entry.date.format(DATE_FORMAT)));
        lines.push(format!(
            "No. {}: [{}]({})",
            count - index,
            entry.display_name,
            document_link(&entry.path)
        ));
        lines.push(String::new());
    }
    lines.join("\n")
}
