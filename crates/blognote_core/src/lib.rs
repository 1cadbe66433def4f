//! Core build-time logic for the blog content store.
//! This crate owns every rule that derives artifacts from the catalog.

pub mod assets;
pub mod beautify;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod overview;
pub mod readme;
pub mod rename;
pub mod sidebar;
pub mod sitemap;
pub mod stats;
pub mod sync;
pub mod timeline;
pub mod vcs;
pub mod workspace;

pub use catalog::{Catalog, CatalogGroup, DocumentId};
pub use config::{Config, ConfigError, PathsConfig, SitemapConfig, TimelineConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use rename::{RenameError, RenameReport};
pub use stats::{DocumentStats, StatsTotals};
pub use sync::{SyncError, SyncReport};
pub use timeline::{reconcile, Reconciliation, TimelineEntry, TimelineLine};
pub use vcs::{GitCli, NoHistory, VersionControl};
pub use workspace::{DocumentSource, FsError, FsResult, Workspace};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
