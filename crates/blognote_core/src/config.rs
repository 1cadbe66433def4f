//! `blognote.toml` configuration loading and validation.
//!
//! # Responsibility
//! - Parse the content-store configuration (paths, timeline policy, sitemap
//!   settings and the document catalog).
//! - Resolve relative paths against the content root.
//!
//! # Invariants
//! - A returned `Config` has passed `validate()`.
//! - `paths.root` is absolute or relative to the process working directory;
//!   every other path is relative to `paths.root`.

use crate::catalog::Catalog;
use log::warn;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default configuration file name looked up at the content root.
pub const DEFAULT_CONFIG_FILE: &str = "blognote.toml";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, .. } => write!(f, "failed to read config `{}`", path.display()),
            Self::Parse { path, .. } => write!(f, "failed to parse config `{}`", path.display()),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// File-system layout of the content store and its publishing projects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub root: PathBuf,
    pub timeline: PathBuf,
    pub overview: PathBuf,
    pub readme: PathBuf,
    /// Directory of archived articles counted by the overview statistics.
    pub backup: PathBuf,
    /// Mirrored blog project receiving group directories and `_sidebar.md`.
    pub blog_dir: PathBuf,
    /// Static-site `docs` directory holding one sub-directory per language.
    pub ssg_docs_dir: PathBuf,
    /// Translated documents copied into the main-language site directory.
    pub i18n_dir: PathBuf,
    pub sidebar_manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            timeline: PathBuf::from("Timeline.md"),
            overview: PathBuf::from("Overview.md"),
            readme: PathBuf::from("README.md"),
            backup: PathBuf::from("Backup"),
            blog_dir: PathBuf::from("../Blog"),
            ssg_docs_dir: PathBuf::from("../Blog-SSG/docs"),
            i18n_dir: PathBuf::from("i18n"),
            sidebar_manifest: PathBuf::from("../Blog-SSG/sidebar.json"),
        }
    }
}

/// Which catalog documents the timeline tracks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineConfig {
    pub title: String,
    /// Allow-list of group labels.
    pub groups: Vec<String>,
    /// Deny-list of document ids excluded even when their group is allowed.
    pub exclude: Vec<String>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            title: "Timeline".to_string(),
            groups: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Site origin, e.g. `https://blog.example.com/`.
    pub domain: String,
    /// Published languages; the first one is served from the site root.
    pub langs: Vec<String>,
    pub output_dir: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            langs: vec!["en-us".to_string(), "zh-cn".to_string()],
            output_dir: PathBuf::from("../Blog-SSG/docs/public"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    pub timeline: TimelineConfig,
    pub sitemap: SitemapConfig,
    pub catalog: Catalog,
}

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// A relative `paths.root` is resolved against the directory holding the
    /// configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&text, base_dir).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> ConfigResult<Self> {
        let mut config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            source,
        })?;
        if config.paths.root.is_relative() {
            config.paths.root = base_dir.join(&config.paths.root);
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks catalog and policy invariants.
    ///
    /// # Errors
    /// - Empty or duplicate group names.
    /// - Document ids without a `<Group>/` prefix, or with whitespace around
    ///   the group or title.
    /// - An empty sitemap language list.
    ///
    /// Allow-listed timeline groups missing from the catalog only log a warning.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = std::collections::HashSet::new();
        for group in self.catalog.groups() {
            if group.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "catalog group name cannot be empty".to_string(),
                ));
            }
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate catalog group `{}`",
                    group.name
                )));
            }
            if let Some(doc) = group.docs.iter().find(|doc| !is_document_id(doc)) {
                return Err(ConfigError::Invalid(format!(
                    "document `{doc}` in group `{}` must look like `<Group>/<Title>`",
                    group.name
                )));
            }
        }

        if self.sitemap.langs.is_empty() {
            return Err(ConfigError::Invalid(
                "sitemap.langs must name at least one language".to_string(),
            ));
        }

        if self.catalog.is_empty() {
            warn!("event=config_validate module=config status=warn reason=catalog_empty");
        }

        for group in &self.timeline.groups {
            if self.catalog.group(group).is_none() {
                warn!("event=config_validate module=config status=warn timeline_group_missing={group}");
            }
        }

        Ok(())
    }

    /// Resolves a configured path against the content root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.paths.root.join(path)
    }
}

/// Both parts must be non-empty and carry no surrounding whitespace; the
/// timeline reads titles back trimmed.
fn is_document_id(id: &str) -> bool {
    let is_part = |part: &str| !part.is_empty() && part.trim() == part;
    match id.split_once('/') {
        Some((group, title)) => is_part(group) && is_part(title),
        None => false,
    }
}
