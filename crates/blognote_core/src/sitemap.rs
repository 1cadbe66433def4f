//! Per-language XML sitemaps for the static site.
//!
//! # Responsibility
//! - Emit one `urlset` per published language from the sidebar links.
//! - Attach `lastmod` from version-control history when available.
//!
//! # Invariants
//! - The first configured language is served from the site root; every other
//!   language is served under `/<lang>/`.
//! - History lookup failures only drop `lastmod`; they never fail the run.

use crate::catalog::decode_link;
use crate::config::SitemapConfig;
use crate::vcs::VersionControl;
use crate::workspace::{FsResult, Workspace};
use chrono::SecondsFormat;
use log::info;
use std::path::{Path, PathBuf};

const URLSET_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset
    xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.sitemaps.org/schemas/sitemap/0.9
        http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd"
>"#;
const URLSET_CLOSE: &str = "</urlset>";
const PRIORITY: &str = "1.0";

/// `sitemap-<prefix>.xml`, where prefix is the language before the first `-`.
pub fn sitemap_file_name(lang: &str) -> String {
    let prefix = lang.split('-').next().unwrap_or(lang);
    format!("sitemap-{prefix}.xml")
}

/// Renders the sitemap of one language.
///
/// `links` are sidebar item links (space-encoded ids); `docs_dir` is the
/// static-site docs directory whose `<lang>/<id>.md` files are looked up in
/// history.
pub fn render_sitemap<V>(
    domain: &str,
    lang: &str,
    main_lang: &str,
    links: &[String],
    docs_dir: &Path,
    vcs: &V,
) -> String
where
    V: VersionControl + ?Sized,
{
    let domain = normalize_domain(domain);
    let base = if lang == main_lang {
        String::new()
    } else {
        format!("{lang}/")
    };

    let mut content = vec![URLSET_OPEN.to_string()];
    content.push(format!(
        "\n<url>\n  <loc>{}</loc>\n  <priority>{PRIORITY}</priority>\n</url>\n",
        escape_xml(&domain)
    ));

    for link in links {
        let file = docs_dir
            .join(lang)
            .join(format!("{}.md", decode_link(link)));
        content.push("<url>".to_string());
        content.push(format!(
            "  <loc>{}</loc>",
            escape_xml(&format!("{domain}{base}{link}.html"))
        ));
        content.push(format!("  <priority>{PRIORITY}</priority>"));
        if let Some(time) = vcs.last_modified(&file) {
            content.push(format!(
                "  <lastmod>{}</lastmod>",
                time.to_rfc3339_opts(SecondsFormat::Millis, true)
            ));
        }
        content.push("</url>\n".to_string());
    }
    content.push(URLSET_CLOSE.to_string());
    content.join("\n")
}

/// Renders and writes the sitemap of every configured language.
///
/// Returns the written file paths in language order.
pub fn write_sitemaps<V>(
    workspace: &Workspace,
    settings: &SitemapConfig,
    docs_dir: &Path,
    links: &[String],
    vcs: &V,
) -> FsResult<Vec<PathBuf>>
where
    V: VersionControl + ?Sized,
{
    let Some(main_lang) = settings.langs.first() else {
        return Ok(Vec::new());
    };
    let docs_dir = workspace.resolve(docs_dir);
    let mut written = Vec::with_capacity(settings.langs.len());

    for lang in &settings.langs {
        let xml = render_sitemap(&settings.domain, lang, main_lang, links, &docs_dir, vcs);
        let target = settings.output_dir.join(sitemap_file_name(lang));
        workspace.write_text(&target, &xml)?;
        info!(
            "event=sitemap_write module=sitemap status=ok lang={lang} urls={} path={}",
            links.len() + 1,
            target.display()
        );
        written.push(workspace.resolve(target));
    }
    Ok(written)
}

fn normalize_domain(domain: &str) -> String {
    let trimmed = domain.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
