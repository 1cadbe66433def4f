//! Document catalog domain model.
//!
//! # Responsibility
//! - Hold the ordered `group -> document id` mapping every artifact is
//!   derived from.
//! - Derive the timeline-eligible subset and the link form of document ids.
//!
//! # Invariants
//! - Group order and document order inside a group are display order.
//! - A document may appear under several groups; the catalog never
//!   deduplicates, only the eligible subset does.
//! - The catalog is immutable once built and is passed by reference.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Document identifier of the form `<Group>/<Title>`.
pub type DocumentId = String;

const MARKDOWN_SUFFIX: &str = ".md";
const ENCODED_SPACE: &str = "%20";

/// One display group of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogGroup {
    /// Group label; also the directory holding the group's documents.
    pub name: String,
    /// Document ids in display order.
    #[serde(default)]
    pub docs: Vec<DocumentId>,
}

impl CatalogGroup {
    pub fn new(name: impl Into<String>, docs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            docs: docs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered catalog of document groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CatalogGroup>")]
pub struct Catalog {
    groups: Vec<CatalogGroup>,
}

impl From<Vec<CatalogGroup>> for Catalog {
    fn from(groups: Vec<CatalogGroup>) -> Self {
        Self { groups }
    }
}

impl<G, D, I> FromIterator<(G, I)> for Catalog
where
    G: Into<String>,
    D: Into<String>,
    I: IntoIterator<Item = D>,
{
    fn from_iter<T: IntoIterator<Item = (G, I)>>(iter: T) -> Self {
        Self {
            groups: iter
                .into_iter()
                .map(|(name, docs)| CatalogGroup::new(name, docs))
                .collect(),
        }
    }
}

impl Catalog {
    pub fn new(groups: Vec<CatalogGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&CatalogGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.name.as_str())
    }

    /// Iterates `(group, document id)` pairs in display order.
    ///
    /// Documents listed under several groups are yielded once per group.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups.iter().flat_map(|group| {
            group
                .docs
                .iter()
                .map(move |doc| (group.name.as_str(), doc.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.docs.is_empty())
    }

    /// Returns the timeline-eligible subset in catalog order.
    ///
    /// A document is eligible when one of its groups is in `allow` and its id
    /// is not in `deny`. Each id is returned once, at its first occurrence.
    /// Deny entries that name no catalog document have no effect.
    pub fn eligible<A, D>(&self, allow: &[A], deny: &[D]) -> Vec<&str>
    where
        A: AsRef<str>,
        D: AsRef<str>,
    {
        let allow: HashSet<&str> = allow.iter().map(AsRef::as_ref).collect();
        let deny: HashSet<&str> = deny.iter().map(AsRef::as_ref).collect();
        let mut seen = HashSet::new();

        self.documents()
            .filter(|(group, id)| allow.contains(group) && !deny.contains(id))
            .filter_map(|(_, id)| seen.insert(id).then_some(id))
            .collect()
    }
}

/// Returns the title part of a document id (text after the last `/`).
pub fn display_name(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Encodes spaces of a document id the way published links expect.
pub fn encode_id(id: &str) -> String {
    id.replace(' ', ENCODED_SPACE)
}

/// Relative markdown link of a document, e.g. `HTML/Web%20Worker.md`.
pub fn document_link(id: &str) -> String {
    format!("{}{MARKDOWN_SUFFIX}", encode_id(id))
}

/// Inverse of [`document_link`]: decodes `%XX` escapes and drops the `.md`
/// suffix.
///
/// Links written by hand may escape more than spaces (`C%2B%2B.md`), so every
/// escape is decoded. Invalid UTF-8 sequences decode lossily.
pub fn decode_link(link: &str) -> DocumentId {
    let decoded = percent_decode_str(link.trim()).decode_utf8_lossy();
    match decoded.strip_suffix(MARKDOWN_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => decoded.into_owned(),
    }
}

/// Collects the document ids linked from a pasted bullet list.
///
/// Accepts lines such as `* [Web Worker](HTML/Web%20Worker.md)`; lines
/// without a markdown link are skipped.
pub fn ids_from_bullets(text: &str) -> Vec<DocumentId> {
    text.lines()
        .filter_map(|line| line.split_once("](").map(|(_, rest)| rest))
        .filter_map(|rest| rest.trim_end().strip_suffix(')'))
        .map(decode_link)
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_link, display_name, document_link, ids_from_bullets, Catalog};

    fn sample() -> Catalog {
        Catalog::from_iter([
            ("HTML", vec!["HTML/DOCTYPE", "HTML/Web Worker"]),
            ("MyLife", vec!["MyLife/Diary", "Security/CTF"]),
            ("Security", vec!["Security/CTF"]),
        ])
    }

    #[test]
    fn documents_follow_group_then_item_order() {
        let catalog = sample();
        let ids: Vec<&str> = catalog.documents().map(|(_, id)| id).collect();
        assert_eq!(
            ids,
            vec![
                "HTML/DOCTYPE",
                "HTML/Web Worker",
                "MyLife/Diary",
                "Security/CTF",
                "Security/CTF"
            ]
        );
    }

    #[test]
    fn eligible_filters_by_group_and_deny_list() {
        let catalog = sample();
        let eligible = catalog.eligible(&["MyLife", "Security"], &["MyLife/Diary"]);
        assert_eq!(eligible, vec!["Security/CTF"]);
    }

    #[test]
    fn eligible_ignores_deny_entries_outside_catalog() {
        let catalog = sample();
        let eligible = catalog.eligible(&["HTML"], &["Nowhere/Missing"]);
        assert_eq!(eligible, vec!["HTML/DOCTYPE", "HTML/Web Worker"]);
    }

    #[test]
    fn link_helpers_are_inverse() {
        assert_eq!(document_link("HTML/Web Worker"), "HTML/Web%20Worker.md");
        assert_eq!(decode_link("HTML/Web%20Worker.md"), "HTML/Web Worker");
        assert_eq!(display_name("HTML/Web Worker"), "Web Worker");
        assert_eq!(display_name("Loose"), "Loose");
    }

    #[test]
    fn decode_link_handles_every_escape() {
        assert_eq!(decode_link("Lang/C%2B%2B.md"), "Lang/C++");
        assert_eq!(decode_link("Lang/100%25%20done.md"), "Lang/100% done");
        assert_eq!(document_link("Lang/C++"), "Lang/C++.md");
    }

    #[test]
    fn bullets_become_catalog_ids() {
        let text = "\n* [Diary](MyLife/Diary.md)\n\
                    * [Web Worker](HTML/Web%20Worker.md)\n\
                    plain line\n";
        assert_eq!(
            ids_from_bullets(text),
            vec!["MyLife/Diary".to_string(), "HTML/Web Worker".to_string()]
        );
    }

    #[test]
    fn empty_catalog_has_no_documents() {
        assert!(Catalog::from_iter([("HTML", Vec::<&str>::new())]).is_empty());
        assert!(!sample().is_empty());
    }
}
