//! Navigation artifacts derived from the catalog.
//!
//! # Responsibility
//! - Render the markdown bullet index used by `_sidebar.md` and the overview.
//! - Build the static-site sidebar manifest (`sidebar.json`).
//!
//! # Invariants
//! - Group and item order always follow the catalog.
//! - Manifest item links are space-encoded ids without the `.md` suffix.

use crate::catalog::{display_name, document_link, encode_id, Catalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Manifest key for the site-wide sidebar.
pub const ROOT_SIDEBAR_KEY: &str = "";

/// One collapsible group of the static-site sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarGroup {
    pub text: String,
    #[serde(default)]
    pub collapsed: bool,
    pub items: Vec<String>,
}

/// Sidebar manifest keyed by route prefix.
pub type SidebarManifest = BTreeMap<String, Vec<SidebarGroup>>;

/// Builds the manifest consumed by the static-site generator.
pub fn build_manifest(catalog: &Catalog) -> SidebarManifest {
    let groups = catalog
        .groups()
        .iter()
        .map(|group| SidebarGroup {
            text: group.name.clone(),
            collapsed: true,
            items: group.docs.iter().map(|doc| encode_id(doc)).collect(),
        })
        .collect();
    BTreeMap::from([(ROOT_SIDEBAR_KEY.to_string(), groups)])
}

pub fn render_manifest(manifest: &SidebarManifest) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

/// Flattens every item link of the manifest in display order.
pub fn manifest_links(manifest: &SidebarManifest) -> Vec<String> {
    manifest
        .values()
        .flatten()
        .flat_map(|group| group.items.iter().cloned())
        .collect()
}

/// Nested bullet list: `* <Group>` then `  * [<Title>](<link>)` per item,
/// followed by one blank line per group.
pub fn bullet_index(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    for group in catalog.groups() {
        lines.push(format!("* {}", group.name));
        for doc in &group.docs {
            lines.push(format!("  * [{}]({})", display_name(doc), document_link(doc)));
        }
        lines.push(String::new());
    }
    lines
}

/// `_sidebar.md` of the mirrored blog.
pub fn render_blog_sidebar(catalog: &Catalog) -> String {
    bullet_index(catalog).join("\n")
}
