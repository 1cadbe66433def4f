//! Bulk document rename migration.
//!
//! # Responsibility
//! - Load an `old = "new"` title map.
//! - Apply it to the catalog configuration, the timeline and the document
//!   file names in one pass.
//!
//! # Invariants
//! - Text files are rewritten by plain substring replacement, applied in
//!   key order.
//! - Only `*.md` files whose stem equals a map key are renamed; they stay in
//!   their directory.
//! - No entry's new name is another entry's old name.
//! - Every rename target is checked before any file is written; an existing
//!   target aborts the run with nothing changed.

use crate::config::ConfigError;
use crate::workspace::{FsError, Workspace};
use log::{info, warn};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type RenameMap = BTreeMap<String, String>;

pub type RenameResult<T> = Result<T, RenameError>;

/// Rename migration error.
#[derive(Debug)]
pub enum RenameError {
    /// `to` is renamed itself by another entry, so text replacement would
    /// chain through both.
    ChainedEntry { from: String, to: String },
    Fs(FsError),
}

impl Display for RenameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChainedEntry { from, to } => write!(
                f,
                "rename map entry `{from}` -> `{to}` targets a name that is renamed itself"
            ),
            Self::Fs(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RenameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ChainedEntry { .. } => None,
            Self::Fs(err) => Some(err),
        }
    }
}

impl From<FsError> for RenameError {
    fn from(value: FsError) -> Self {
        Self::Fs(value)
    }
}

/// Files touched by one rename run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub text_files_updated: Vec<PathBuf>,
    pub documents_renamed: Vec<(PathBuf, PathBuf)>,
}

/// Loads a flat TOML table of `old = "new"` pairs.
pub fn load_rename_map(path: &Path) -> Result<RenameMap, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces every map key found in `text` with its value.
pub fn apply_name_map(text: &str, map: &RenameMap) -> String {
    map.iter()
        .filter(|(from, _)| !from.is_empty())
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
}

/// Rejects maps where one entry's new name is another entry's old name.
pub fn check_rename_map(map: &RenameMap) -> RenameResult<()> {
    match map
        .iter()
        .find(|(from, to)| from != to && map.contains_key(to.as_str()))
    {
        Some((from, to)) => Err(RenameError::ChainedEntry {
            from: from.clone(),
            to: to.clone(),
        }),
        None => Ok(()),
    }
}

/// Lists `(from, to)` document renames, failing on the first target that
/// already exists or is claimed by an earlier rename.
fn plan_renames(workspace: &Workspace, map: &RenameMap) -> RenameResult<Vec<(PathBuf, PathBuf)>> {
    let mut plan = Vec::new();
    let mut claimed = HashSet::new();

    for path in workspace.walk_markdown()? {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(target_stem) = map.get(stem) else {
            continue;
        };
        let target = path.with_file_name(format!("{target_stem}.md"));
        if target == path {
            continue;
        }
        if workspace.exists(&target) || !claimed.insert(target.clone()) {
            warn!(
                "event=rename_plan module=rename status=error reason=target_exists from={} to={}",
                path.display(),
                target.display()
            );
            return Err(RenameError::Fs(FsError::Rename {
                from: path,
                to: target,
                source: io::Error::new(io::ErrorKind::AlreadyExists, "target document already exists"),
            }));
        }
        plan.push((path, target));
    }

    Ok(plan)
}

/// Rewrites `text_files` and renames matching documents below the root.
///
/// Missing text files are skipped.
///
/// # Errors
/// - [`RenameError::ChainedEntry`] for a chained map.
/// - [`FsError::Rename`] with [`io::ErrorKind::AlreadyExists`] when a target
///   document exists. Both checks run before any file is modified.
pub fn rename_documents(
    workspace: &Workspace,
    map: &RenameMap,
    text_files: &[&Path],
) -> RenameResult<RenameReport> {
    check_rename_map(map)?;
    let plan = plan_renames(workspace, map)?;
    let mut report = RenameReport::default();

    for file in text_files {
        if !workspace.exists(file) {
            continue;
        }
        let original = workspace.read_text(file)?;
        let updated = apply_name_map(&original, map);
        if updated != original {
            workspace.write_text(file, &updated)?;
            report.text_files_updated.push(workspace.resolve(file));
        }
    }

    for (path, target) in plan {
        workspace.rename(&path, &target)?;
        report.documents_renamed.push((path, target));
    }

    info!(
        "event=rename_documents module=rename status=ok text_files={} documents={}",
        report.text_files_updated.len(),
        report.documents_renamed.len()
    );
    Ok(report)
}
