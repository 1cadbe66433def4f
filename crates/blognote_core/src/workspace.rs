//! File-system capability rooted at the content store.
//!
//! # Responsibility
//! - Read, write, list and copy files relative to the content root.
//! - Provide document text to the timeline reconciler via `DocumentSource`.
//!
//! # Invariants
//! - Relative paths are always resolved against `Workspace::root`.
//! - Writes create missing parent directories.
//! - Every failure carries the path it happened on.

use glob::Pattern;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug)]
pub enum FsError {
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Write {
        path: PathBuf,
        source: io::Error,
    },
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    Pattern {
        pattern: String,
        message: String,
    },
}

impl FsError {
    fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::Read {
            path: path.into(),
            source: io::Error::new(io::ErrorKind::NotFound, "document not found"),
        }
    }
}

impl Display for FsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, .. } => write!(f, "failed to read `{}`", path.display()),
            Self::Write { path, .. } => write!(f, "failed to write `{}`", path.display()),
            Self::Copy { from, to, .. } => write!(
                f,
                "failed to copy `{}` to `{}`",
                from.display(),
                to.display()
            ),
            Self::Rename { from, to, .. } => write!(
                f,
                "failed to rename `{}` to `{}`",
                from.display(),
                to.display()
            ),
            Self::Pattern { pattern, message } => {
                write!(f, "invalid file pattern `{pattern}`: {message}")
            }
        }
    }
}

impl Error for FsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Copy { source, .. }
            | Self::Rename { source, .. } => Some(source),
            Self::Pattern { .. } => None,
        }
    }
}

/// Supplies the raw text of a catalog document.
pub trait DocumentSource {
    fn read_document(&self, id: &str) -> FsResult<String>;
}

impl DocumentSource for HashMap<String, String> {
    fn read_document(&self, id: &str) -> FsResult<String> {
        self.get(id).cloned().ok_or_else(|| FsError::not_found(id))
    }
}

impl DocumentSource for BTreeMap<String, String> {
    fn read_document(&self, id: &str) -> FsResult<String> {
        self.get(id).cloned().ok_or_else(|| FsError::not_found(id))
    }
}

/// Local content store rooted at one directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// On-disk location of a document id (`<root>/<id>.md`).
    pub fn document_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).exists()
    }

    pub fn read_text(&self, path: impl AsRef<Path>) -> FsResult<String> {
        let path = self.resolve(path);
        std::fs::read_to_string(&path).map_err(|source| FsError::Read { path, source })
    }

    pub fn write_text(&self, path: impl AsRef<Path>, content: &str) -> FsResult<()> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| FsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, content).map_err(|source| FsError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(
            "event=file_write module=workspace status=ok path={} bytes={}",
            path.display(),
            content.len()
        );
        Ok(())
    }

    /// Lists `*.md` files directly inside `dir`, sorted by path.
    ///
    /// A missing directory yields an empty list.
    pub fn list_markdown(&self, dir: impl AsRef<Path>) -> FsResult<Vec<PathBuf>> {
        let dir = self.resolve(dir);
        let pattern = format!("{}/*.md", Pattern::escape(&dir.to_string_lossy()));
        let entries = glob::glob(&pattern).map_err(|err| FsError::Pattern {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| FsError::Read {
                path: err.path().to_path_buf(),
                source: io::Error::new(err.error().kind(), err.error().to_string()),
            })?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Lists every `*.md` file below the root, skipping hidden directories.
    pub fn walk_markdown(&self) -> FsResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));
        for entry in walker {
            let entry = entry.map_err(|err| walk_error(&self.root, err))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Copies directory `from` into `to_parent`, like `cp -r from to_parent/`.
    ///
    /// Returns the number of files copied.
    pub fn copy_dir_into(
        &self,
        from: impl AsRef<Path>,
        to_parent: impl AsRef<Path>,
    ) -> FsResult<usize> {
        let from = self.resolve(from);
        let to_parent = self.resolve(to_parent);
        let target = match from.file_name() {
            Some(name) => to_parent.join(name),
            None => to_parent,
        };
        copy_tree(&from, &target)
    }

    /// Copies the entries of directory `from` into `to`, like `cp -r from/* to`.
    pub fn copy_contents_into(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
    ) -> FsResult<usize> {
        copy_tree(&self.resolve(from), &self.resolve(to))
    }

    /// Copies one file into directory `to_dir`, keeping its file name.
    pub fn copy_file_into(&self, from: impl AsRef<Path>, to_dir: impl AsRef<Path>) -> FsResult<()> {
        let from = self.resolve(from);
        let to_dir = self.resolve(to_dir);
        let target = match from.file_name() {
            Some(name) => to_dir.join(name),
            None => to_dir.clone(),
        };
        std::fs::create_dir_all(&to_dir).map_err(|source| FsError::Write {
            path: to_dir.clone(),
            source,
        })?;
        std::fs::copy(&from, &target).map_err(|source| FsError::Copy {
            from,
            to: target,
            source,
        })?;
        Ok(())
    }

    /// Moves a file; an existing target is never overwritten.
    pub fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> FsResult<()> {
        let from = self.resolve(from);
        let to = self.resolve(to);
        if to.exists() {
            return Err(FsError::Rename {
                from,
                to,
                source: io::Error::new(io::ErrorKind::AlreadyExists, "target already exists"),
            });
        }
        std::fs::rename(&from, &to).map_err(|source| FsError::Rename { from, to, source })
    }
}

impl DocumentSource for Workspace {
    fn read_document(&self, id: &str) -> FsResult<String> {
        let path = self.document_path(id);
        std::fs::read_to_string(&path).map_err(|source| FsError::Read { path, source })
    }
}

fn copy_tree(from: &Path, to: &Path) -> FsResult<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.map_err(|err| walk_error(from, err))?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|source| FsError::Write {
                path: target.clone(),
                source,
            })?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|source| FsError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
            copied += 1;
        }
    }
    debug!(
        "event=copy_tree module=workspace status=ok from={} to={} files={copied}",
        from.display(),
        to.display()
    );
    Ok(copied)
}

fn walk_error(root: &Path, err: walkdir::Error) -> FsError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory walk failed"));
    FsError::Read { path, source }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::{DocumentSource, FsError, Workspace};
    use std::collections::HashMap;

    #[test]
    fn in_memory_source_reports_missing_document() {
        let docs: HashMap<String, String> = HashMap::new();
        let err = docs.read_document("Docs/Missing").unwrap_err();
        assert!(matches!(err, FsError::Read { .. }));
        assert!(err.to_string().contains("Docs/Missing"));
    }

    #[test]
    fn document_path_appends_markdown_suffix() {
        let workspace = Workspace::new("/content");
        assert_eq!(
            workspace.document_path("HTML/Web Worker"),
            std::path::Path::new("/content/HTML/Web Worker.md")
        );
    }

    #[test]
    fn rename_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        let workspace = Workspace::new(dir.path());

        let err = workspace.rename("a.md", "b.md").unwrap_err();
        assert!(matches!(
            &err,
            FsError::Rename { source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
        ));
        assert_eq!(workspace.read_text("b.md").unwrap(), "b");
        assert_eq!(workspace.read_text("a.md").unwrap(), "a");
    }
}
