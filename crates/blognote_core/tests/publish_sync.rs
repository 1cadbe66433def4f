use blognote_core::overview::{collect_corpus_stats, render_overview, update_readme};
use blognote_core::sidebar::SidebarManifest;
use blognote_core::sync::{sync_blog, sync_ssg, BLOG_SIDEBAR_FILE};
use blognote_core::{Catalog, PathsConfig, Workspace};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    content: PathBuf,
    workspace: Workspace,
    paths: PathsConfig,
}

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn setup() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("content");
    write(&content.join("HTML/DOCTYPE.md"), "doctype body");
    write(&content.join("HTML/Web Worker.md"), "worker\nbody");
    write(&content.join("HTML/screenshots/1-2.png"), "png");
    write(&content.join("Backup/Archived.md"), "old");
    write(&content.join("i18n/HTML/DOCTYPE.md"), "translated");
    write(&content.join("Overview.md"), "# Overview\n");

    let paths = PathsConfig {
        root: content.clone(),
        blog_dir: PathBuf::from("../Blog"),
        ssg_docs_dir: PathBuf::from("../Blog-SSG/docs"),
        sidebar_manifest: PathBuf::from("../Blog-SSG/sidebar.json"),
        ..PathsConfig::default()
    };
    Fixture {
        workspace: Workspace::new(&content),
        content,
        _dir: dir,
        paths,
    }
}

fn catalog() -> Catalog {
    Catalog::from_iter([
        ("HTML", vec!["HTML/DOCTYPE", "HTML/Web Worker"]),
        ("Vue", vec!["Vue/Missing"]),
    ])
}

#[test]
fn corpus_stats_cover_group_dirs_and_backup() {
    let fixture = setup();
    let totals =
        collect_corpus_stats(&fixture.workspace, &catalog(), Path::new("Backup")).unwrap();
    assert_eq!(totals.count, 3);
    assert_eq!(totals.lines, 4);
    assert_eq!(totals.characters, 12 + 11 + 3);

    let overview = render_overview(&catalog(), &totals);
    assert!(overview.contains("3 articles"));
    assert!(overview.contains("  * [Web Worker](HTML/Web%20Worker.md)"));
}

#[test]
fn readme_blocks_are_regenerated_from_catalog() {
    let fixture = setup();
    let totals =
        collect_corpus_stats(&fixture.workspace, &catalog(), Path::new("Backup")).unwrap();
    let readme = "# Blog\n<!-- Content Start -->\nstale\n<!-- Content End -->\n";
    let updated = update_readme(readme, &catalog(), &totals);
    assert!(updated.contains("## HTML\n* [DOCTYPE](HTML/DOCTYPE.md)"));
    assert!(!updated.contains("stale"));
}

#[test]
fn blog_sync_copies_groups_overview_and_sidebar() {
    let fixture = setup();
    let report = sync_blog(&fixture.workspace, &catalog(), &fixture.paths).unwrap();

    assert_eq!(report.groups_copied, 1);
    assert_eq!(report.groups_skipped, vec!["Vue".to_string()]);
    assert_eq!(report.files_copied, 4);

    let blog = fixture.content.join("../Blog");
    assert_eq!(
        fs::read_to_string(blog.join("HTML/Web Worker.md")).unwrap(),
        "worker\nbody"
    );
    assert!(blog.join("HTML/screenshots/1-2.png").is_file());
    assert!(blog.join("Overview.md").is_file());
    let sidebar = fs::read_to_string(blog.join(BLOG_SIDEBAR_FILE)).unwrap();
    assert!(sidebar.starts_with("* HTML\n  * [DOCTYPE](HTML/DOCTYPE.md)"));
}

#[test]
fn ssg_sync_splits_languages_and_writes_manifest() {
    let fixture = setup();
    let report = sync_ssg(&fixture.workspace, &catalog(), &fixture.paths).unwrap();
    assert_eq!(report.groups_copied, 1);

    let docs = fixture.content.join("../Blog-SSG/docs");
    assert!(docs.join("zh-cn/HTML/DOCTYPE.md").is_file());
    assert_eq!(
        fs::read_to_string(docs.join("en-us/HTML/DOCTYPE.md")).unwrap(),
        "translated"
    );

    let manifest_text =
        fs::read_to_string(fixture.content.join("../Blog-SSG/sidebar.json")).unwrap();
    let manifest: SidebarManifest = serde_json::from_str(&manifest_text).unwrap();
    let groups = &manifest[""];
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].items, vec!["HTML/DOCTYPE", "HTML/Web%20Worker"]);
}
