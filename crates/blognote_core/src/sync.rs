//! Mirroring of the content store into the publishing projects.
//!
//! # Responsibility
//! - Copy catalog group directories into the blog and static-site projects.
//! - Write the navigation artifacts each project needs next to the copies.
//!
//! # Invariants
//! - Group directories missing from the content store are skipped, not fatal.
//! - Any copy or write failure aborts the sync.

use crate::catalog::Catalog;
use crate::config::PathsConfig;
use crate::sidebar::{build_manifest, render_blog_sidebar, render_manifest};
use crate::workspace::{FsError, Workspace};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Blog sidebar file written into the blog project.
pub const BLOG_SIDEBAR_FILE: &str = "_sidebar.md";
/// Static-site language directory receiving the catalog groups.
pub const SOURCE_LANG_DIR: &str = "zh-cn";
/// Static-site language directory receiving the translated documents.
pub const TRANSLATED_LANG_DIR: &str = "en-us";

#[derive(Debug)]
pub enum SyncError {
    Fs(FsError),
    Manifest(serde_json::Error),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fs(err) => write!(f, "{err}"),
            Self::Manifest(_) => write!(f, "failed to serialize sidebar manifest"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fs(err) => err.source(),
            Self::Manifest(err) => Some(err),
        }
    }
}

impl From<FsError> for SyncError {
    fn from(value: FsError) -> Self {
        Self::Fs(value)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(value: serde_json::Error) -> Self {
        Self::Manifest(value)
    }
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub groups_copied: usize,
    pub groups_skipped: Vec<String>,
    pub files_copied: usize,
}

/// Copies the catalog into the blog project, then refreshes its overview and
/// sidebar.
pub fn sync_blog(
    workspace: &Workspace,
    catalog: &Catalog,
    paths: &PathsConfig,
) -> Result<SyncReport, SyncError> {
    info!("event=sync_blog module=sync status=start target={}", paths.blog_dir.display());
    let mut report = copy_groups(workspace, catalog, &paths.blog_dir)?;

    if workspace.exists(&paths.overview) {
        workspace.copy_file_into(&paths.overview, &paths.blog_dir)?;
        report.files_copied += 1;
    } else {
        warn!(
            "event=sync_blog module=sync status=warn reason=overview_missing path={}",
            paths.overview.display()
        );
    }

    workspace.write_text(
        paths.blog_dir.join(BLOG_SIDEBAR_FILE),
        &render_blog_sidebar(catalog),
    )?;

    info!(
        "event=sync_blog module=sync status=ok groups={} skipped={} files={}",
        report.groups_copied,
        report.groups_skipped.len(),
        report.files_copied
    );
    Ok(report)
}

/// Copies the catalog and the translations into the static-site project and
/// writes its sidebar manifest.
pub fn sync_ssg(
    workspace: &Workspace,
    catalog: &Catalog,
    paths: &PathsConfig,
) -> Result<SyncReport, SyncError> {
    info!(
        "event=sync_ssg module=sync status=start target={}",
        paths.ssg_docs_dir.display()
    );
    let mut report = copy_groups(workspace, catalog, &paths.ssg_docs_dir.join(SOURCE_LANG_DIR))?;

    if workspace.exists(&paths.i18n_dir) {
        report.files_copied += workspace.copy_contents_into(
            &paths.i18n_dir,
            paths.ssg_docs_dir.join(TRANSLATED_LANG_DIR),
        )?;
    } else {
        warn!(
            "event=sync_ssg module=sync status=warn reason=i18n_missing path={}",
            paths.i18n_dir.display()
        );
    }

    write_manifest(workspace, catalog, &paths.sidebar_manifest)?;

    info!(
        "event=sync_ssg module=sync status=ok groups={} skipped={} files={}",
        report.groups_copied,
        report.groups_skipped.len(),
        report.files_copied
    );
    Ok(report)
}

/// Writes the static-site sidebar manifest.
pub fn write_manifest(
    workspace: &Workspace,
    catalog: &Catalog,
    target: &Path,
) -> Result<(), SyncError> {
    let json = render_manifest(&build_manifest(catalog))?;
    workspace.write_text(target, &json)?;
    Ok(())
}

fn copy_groups(
    workspace: &Workspace,
    catalog: &Catalog,
    target: &Path,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();
    for group in catalog.group_names() {
        if !workspace.exists(group) {
            warn!("event=sync_group module=sync status=skip reason=missing_dir group={group}");
            report.groups_skipped.push(group.to_string());
            continue;
        }
        report.files_copied += workspace.copy_dir_into(group, target)?;
        report.groups_copied += 1;
    }
    Ok(report)
}
