//! `blognote` command-line entry point.
//!
//! # Responsibility
//! - Parse flags, load `blognote.toml` and initialize logging.
//! - Wire the local workspace and git history into core operations.
//! - Map failures to a non-zero exit status.

use anyhow::{bail, Context, Result};
use blognote_core::config::DEFAULT_CONFIG_FILE;
use blognote_core::overview::{collect_corpus_stats, render_overview, update_readme};
use blognote_core::sidebar::{build_manifest, manifest_links};
use blognote_core::sync::{sync_blog, sync_ssg, write_manifest};
use blognote_core::{
    assets, beautify, catalog, rename, sitemap, timeline, Config, GitCli, Workspace,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "blognote", version)]
#[command(about = "Keeps derived blog artifacts in sync with the document catalog", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Content root, overriding `paths.root`
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// trace | debug | info | warn | error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write rotating log files to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the timeline document
    Timeline {
        /// Date assigned to newly tracked documents (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the result instead of writing it
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Regenerate Overview.md and the README index blocks
    Overview,

    /// Write the static-site sidebar manifest
    Sidebar,

    /// Mirror the catalog into the blog project
    SyncBlog,

    /// Mirror the catalog and translations into the static-site project
    SyncSsg,

    /// Write one sitemap per configured language
    Sitemap,

    /// Rewrite screenshot paths of a translated document to stdout
    Assets {
        file: PathBuf,

        /// Directory of the document being processed
        #[arg(long)]
        context: String,
    },

    /// Beautify pasted prose from a file or stdin to stdout
    Beautify { file: Option<PathBuf> },

    /// Apply an `old = "new"` rename map to documents, catalog and timeline
    Rename {
        #[arg(long)]
        map: PathBuf,
    },

    /// Print quoted catalog ids for a pasted `* [Title](Group/Title.md)` list
    CatalogIds { file: Option<PathBuf> },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| blognote_core::default_log_level().to_string());
    if let Err(err) = blognote_core::init_logging(&level, cli.log_dir.as_deref()) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=command module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let load = || load_config(&cli.config, cli.root.clone());
    match cli.cmd {
        Commands::Timeline { date, dry_run } => run_timeline(&load()?, date, dry_run),
        Commands::Overview => run_overview(&load()?),
        Commands::Sidebar => {
            let config = load()?;
            let workspace = Workspace::new(&config.paths.root);
            write_manifest(&workspace, &config.catalog, &config.paths.sidebar_manifest)?;
            println!(
                "sidebar: {}",
                workspace.resolve(&config.paths.sidebar_manifest).display()
            );
            Ok(())
        }
        Commands::SyncBlog => {
            let config = load()?;
            let workspace = Workspace::new(&config.paths.root);
            let report = sync_blog(&workspace, &config.catalog, &config.paths)?;
            println!(
                "sync-blog: {} groups, {} files",
                report.groups_copied, report.files_copied
            );
            Ok(())
        }
        Commands::SyncSsg => {
            let config = load()?;
            let workspace = Workspace::new(&config.paths.root);
            let report = sync_ssg(&workspace, &config.catalog, &config.paths)?;
            println!(
                "sync-ssg: {} groups, {} files",
                report.groups_copied, report.files_copied
            );
            Ok(())
        }
        Commands::Sitemap => run_sitemap(&load()?, &cli.config),
        Commands::Assets { file, context } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            print!("{}", assets::rewrite_asset_paths(&source, &context));
            Ok(())
        }
        Commands::Beautify { file } => {
            let text = read_input(file.as_deref())?;
            println!("{}", beautify::beautify(&text));
            Ok(())
        }
        Commands::Rename { map } => run_rename(&load()?, &cli.config, &map),
        Commands::CatalogIds { file } => {
            let text = read_input(file.as_deref())?;
            for id in catalog::ids_from_bullets(&text) {
                println!("\"{id}\",");
            }
            Ok(())
        }
    }
}

/// Reads `file`, or stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(file) => std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn load_config(path: &Path, root: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(root) = root {
        config.paths.root = root;
    }
    info!(
        "event=config_load module=cli status=ok version={} path={} root={} groups={}",
        blognote_core::core_version(),
        path.display(),
        config.paths.root.display(),
        config.catalog.groups().len()
    );
    Ok(config)
}

fn run_timeline(config: &Config, date: Option<NaiveDate>, dry_run: bool) -> Result<()> {
    let workspace = Workspace::new(&config.paths.root);
    let timeline_path = &config.paths.timeline;
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    let existing = if workspace.exists(timeline_path) {
        workspace.read_text(timeline_path)?
    } else {
        warn!(
            "event=timeline_read module=cli status=warn reason=missing path={}",
            timeline_path.display()
        );
        String::new()
    };

    let result = timeline::reconcile(
        &config.catalog,
        &config.timeline,
        &existing,
        &workspace,
        today,
    )?;
    if dry_run {
        print!("{}", result.content);
        return Ok(());
    }

    workspace.write_text(timeline_path, &result.content)?;
    println!(
        "timeline: {} entries ({} new, {} carried over)",
        result.entries.len(),
        result.synthesized,
        result.carried_over
    );
    Ok(())
}

fn run_overview(config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.paths.root);
    let paths = &config.paths;

    let totals = collect_corpus_stats(&workspace, &config.catalog, &paths.backup)?;
    workspace.write_text(&paths.overview, &render_overview(&config.catalog, &totals))?;

    let readme = workspace.read_text(&paths.readme)?;
    workspace.write_text(
        &paths.readme,
        &update_readme(&readme, &config.catalog, &totals),
    )?;
    println!("overview: {} articles", totals.count);
    Ok(())
}

fn run_sitemap(config: &Config, config_path: &Path) -> Result<()> {
    if config.sitemap.domain.trim().is_empty() {
        bail!("sitemap.domain must be set in {}", config_path.display());
    }
    let workspace = Workspace::new(&config.paths.root);
    let docs_dir = &config.paths.ssg_docs_dir;
    let links = manifest_links(&build_manifest(&config.catalog));
    let git = GitCli::new(workspace.resolve(docs_dir));

    let written = sitemap::write_sitemaps(&workspace, &config.sitemap, docs_dir, &links, &git)?;
    for path in written {
        println!("sitemap: {}", path.display());
    }
    Ok(())
}

fn run_rename(config: &Config, config_path: &Path, map_path: &Path) -> Result<()> {
    let workspace = Workspace::new(&config.paths.root);
    let map = rename::load_rename_map(map_path)?;
    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", config_path.display()))?;

    let report = rename::rename_documents(
        &workspace,
        &map,
        &[config_path.as_path(), config.paths.timeline.as_path()],
    )?;
    println!(
        "rename: {} documents, {} text files",
        report.documents_renamed.len(),
        report.text_files_updated.len()
    );
    Ok(())
}
