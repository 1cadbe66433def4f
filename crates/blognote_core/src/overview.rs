//! Overview page and README index generation.
//!
//! # Responsibility
//! - Measure the whole corpus (every group directory plus the backup
//!   directory).
//! - Render `Overview.md` and the README `Summary`/`Content` blocks.
//!
//! # Invariants
//! - Corpus statistics count files on disk, not catalog entries; documents
//!   listed under several groups are measured once.

use crate::catalog::{display_name, document_link, Catalog};
use crate::readme::replace_marker_blocks;
use crate::sidebar::bullet_index;
use crate::stats::StatsTotals;
use crate::workspace::{FsResult, Workspace};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

/// Measures every `*.md` directly inside each catalog group directory and
/// the backup directory.
pub fn collect_corpus_stats(
    workspace: &Workspace,
    catalog: &Catalog,
    backup_dir: &Path,
) -> FsResult<StatsTotals> {
    let mut totals = StatsTotals::default();
    let dirs = catalog.group_names().map(Path::new).chain([backup_dir]);
    for dir in dirs {
        for file in workspace.list_markdown(dir)? {
            totals.add_text(&workspace.read_text(&file)?);
        }
    }
    info!(
        "event=corpus_stats module=overview status=ok articles={} lines={} words={} characters={}",
        totals.count, totals.lines, totals.words, totals.characters
    );
    Ok(totals)
}

/// Renders `Overview.md`.
pub fn render_overview(catalog: &Catalog, totals: &StatsTotals) -> String {
    let mut lines = vec![
        "# Overview".to_string(),
        String::new(),
        totals.summary_without_words(),
        String::new(),
    ];
    lines.extend(bullet_index(catalog));
    lines.join("\n")
}

/// README `Content` block: one `## <Group>` list per group.
pub fn readme_content(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    for group in catalog.groups() {
        lines.push(format!("## {}", group.name));
        for doc in &group.docs {
            lines.push(format!("* [{}]({})", display_name(doc), document_link(doc)));
        }
        lines.push(String::new());
    }
    lines
}

/// Regenerates the README `Summary` and `Content` marker blocks.
pub fn update_readme(readme: &str, catalog: &Catalog, totals: &StatsTotals) -> String {
    let sections = BTreeMap::from([
        ("summary".to_string(), vec![totals.summary()]),
        ("content".to_string(), readme_content(catalog)),
    ]);
    replace_marker_blocks(readme, &sections)
}
