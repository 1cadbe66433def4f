use blognote_core::timeline::parse_timeline;
use blognote_core::{reconcile, Catalog, FsError, TimelineConfig, Workspace};
use chrono::NaiveDate;
use std::collections::HashMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings(groups: &[&str], exclude: &[&str]) -> TimelineConfig {
    TimelineConfig {
        title: "Timeline".to_string(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
        exclude: exclude.iter().map(|e| e.to_string()).collect(),
    }
}

fn docs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect()
}

#[test]
fn fresh_timeline_dates_everything_today_in_catalog_order() {
    let catalog = Catalog::from_iter([("Docs", vec!["Docs/A", "Docs/B"])]);
    let source = docs(&[("Docs/A", "hello world"), ("Docs/B", "foo")]);

    let result = reconcile(
        &catalog,
        &settings(&["Docs"], &[]),
        "",
        &source,
        date(2024, 1, 1),
    )
    .unwrap();

    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.synthesized, 2);
    assert_eq!(result.carried_over, 0);
    assert_eq!(result.totals.count, 2);
    assert_eq!(result.totals.words, 3);
    assert_eq!(
        result.content,
        "# Timeline\n\n\
         The repository holds `2` articles, `2` lines, `3` words and `14` characters in total.\n\n\
         ### 2024-01-01\nNo. 2: [A](Docs/A.md)\n\n\
         ### 2024-01-01\nNo. 1: [B](Docs/B.md)\n"
    );
}

#[test]
fn second_run_is_byte_identical() {
    let catalog = Catalog::from_iter([
        ("Docs", vec!["Docs/A", "Docs/Web Worker"]),
        ("Life", vec!["Life/Diary"]),
    ]);
    let policy = settings(&["Docs", "Life"], &[]);
    let source = docs(&[
        ("Docs/A", "alpha"),
        ("Docs/Web Worker", "worker `code`"),
        ("Life/Diary", "日记"),
    ]);

    let first = reconcile(&catalog, &policy, "", &source, date(2024, 3, 9)).unwrap();
    let second = reconcile(&catalog, &policy, &first.content, &source, date(2024, 3, 9)).unwrap();

    assert_eq!(first.content, second.content);
    assert_eq!(second.carried_over, 3);
    assert_eq!(second.synthesized, 0);
}

#[test]
fn recorded_dates_survive_and_new_documents_go_first() {
    let catalog = Catalog::from_iter([("Docs", vec!["Docs/Old", "Docs/New", "Docs/Older"])]);
    let existing = "# Timeline\n\nsummary\n\n\
                    ### 2023-06-01\nNo. 2: [Old](Docs/Old.md)\n\n\
                    ### 2022-01-15\nNo. 1: [Older](Docs/Older.md)\n";
    let source = docs(&[("Docs/Old", "o"), ("Docs/New", "n"), ("Docs/Older", "oo")]);

    let result = reconcile(
        &catalog,
        &settings(&["Docs"], &[]),
        existing,
        &source,
        date(2024, 2, 2),
    )
    .unwrap();

    let summary: Vec<(&str, NaiveDate)> = result
        .entries
        .iter()
        .map(|entry| (entry.path.as_str(), entry.date))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Docs/New", date(2024, 2, 2)),
            ("Docs/Old", date(2023, 6, 1)),
            ("Docs/Older", date(2022, 1, 15)),
        ]
    );
    assert!(result.content.contains("### 2024-02-02\nNo. 3: [New](Docs/New.md)"));
    assert!(result.content.contains("### 2023-06-01\nNo. 2: [Old](Docs/Old.md)"));
    assert!(result.content.ends_with("### 2022-01-15\nNo. 1: [Older](Docs/Older.md)\n"));
}

#[test]
fn serial_numbers_count_down_to_one() {
    let ids: Vec<String> = (0..5).map(|i| format!("Docs/N{i}")).collect();
    let catalog = Catalog::from_iter([("Docs", ids.clone())]);
    let source: HashMap<String, String> =
        ids.iter().map(|id| (id.clone(), "x".to_string())).collect();

    let result = reconcile(
        &catalog,
        &settings(&["Docs"], &[]),
        "",
        &source,
        date(2024, 1, 1),
    )
    .unwrap();

    let serials: Vec<u32> = result
        .content
        .lines()
        .filter_map(|line| line.strip_prefix("No. "))
        .map(|rest| rest.split(':').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(serials, vec![5, 4, 3, 2, 1]);
}

#[test]
fn deny_list_and_untracked_groups_are_never_emitted() {
    let catalog = Catalog::from_iter([
        ("Life", vec!["Life/Public", "Life/Private"]),
        ("HTML", vec!["HTML/DOCTYPE"]),
    ]);
    let existing = "### 2023-01-01\nNo. 1: [Private](Life/Private.md)\n";
    let source = docs(&[("Life/Public", "p")]);

    let result = reconcile(
        &catalog,
        &settings(&["Life"], &["Life/Private", "Nowhere/Ghost"]),
        existing,
        &source,
        date(2024, 1, 1),
    )
    .unwrap();

    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].path, "Life/Public");
    assert!(!result.content.contains("Private"));
    assert!(!result.content.contains("DOCTYPE"));
}

#[test]
fn document_listed_under_two_groups_appears_once() {
    let catalog = Catalog::from_iter([
        ("Interview", vec!["Interview/Round", "Life/Offer"]),
        ("Life", vec!["Life/Offer"]),
    ]);
    let source = docs(&[("Interview/Round", "r"), ("Life/Offer", "o")]);

    let result = reconcile(
        &catalog,
        &settings(&["Interview", "Life"], &[]),
        "",
        &source,
        date(2024, 1, 1),
    )
    .unwrap();

    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.content.matches("Life/Offer.md").count(), 1);
}

#[test]
fn malformed_lines_are_skipped_and_resynthesized() {
    let catalog = Catalog::from_iter([("Docs", vec!["Docs/A", "Docs/B"])]);
    let existing = "### 2023-13-40\nNo. 2: [A](Docs/A.md)\n### 2023-05-05\nNo. ?: [B](Docs/B.md)\n";
    let source = docs(&[("Docs/A", "a"), ("Docs/B", "b")]);

    assert!(parse_timeline(existing).is_empty());

    let result = reconcile(
        &catalog,
        &settings(&["Docs"], &[]),
        existing,
        &source,
        date(2024, 1, 1),
    )
    .unwrap();
    assert_eq!(result.synthesized, 2);
    assert!(result.entries.iter().all(|entry| entry.date == date(2024, 1, 1)));
}

#[test]
fn missing_document_aborts_without_output() {
    let catalog = Catalog::from_iter([("Docs", vec!["Docs/A", "Docs/Gone"])]);
    let source = docs(&[("Docs/A", "a")]);

    let err = reconcile(
        &catalog,
        &settings(&["Docs"], &[]),
        "",
        &source,
        date(2024, 1, 1),
    )
    .unwrap_err();
    assert!(matches!(err, FsError::Read { .. }));
}

#[test]
fn workspace_backed_documents_are_measured_from_disk() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("HTML")).unwrap();
    std::fs::write(root.path().join("HTML/Web Worker.md"), "line one\nline two").unwrap();
    let workspace = Workspace::new(root.path());
    let catalog = Catalog::from_iter([("HTML", vec!["HTML/Web Worker"])]);

    let result = reconcile(
        &catalog,
        &settings(&["HTML"], &[]),
        "",
        &workspace,
        date(2024, 1, 1),
    )
    .unwrap();

    assert_eq!(result.totals.lines, 2);
    assert_eq!(result.totals.words, 4);
    assert!(result
        .content
        .contains("No. 1: [Web Worker](HTML/Web%20Worker.md)"));
}

#[test]
fn escaped_links_keep_their_recorded_date() {
    let catalog = Catalog::from_iter([("Lang", vec!["Lang/C++", "Lang/Go"])]);
    let source = docs(&[("Lang/C++", "templates"), ("Lang/Go", "goroutines")]);
    let existing = "### 2022-05-01\nNo. 1: [C++](Lang/C%2B%2B.md)\n";

    let result = reconcile(
        &catalog,
        &settings(&["Lang"], &[]),
        existing,
        &source,
        date(2024, 1, 1),
    )
    .unwrap();

    assert_eq!(result.carried_over, 1);
    assert_eq!(result.synthesized, 1);
    let cpp = result
        .entries
        .iter()
        .find(|entry| entry.path == "Lang/C++")
        .unwrap();
    assert_eq!(cpp.date, date(2022, 5, 1));
}
