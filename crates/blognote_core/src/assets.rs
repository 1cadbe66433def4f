//! Screenshot path rewriting for translated documents.
//!
//! Translated pages live under `en-us/` but share the screenshots stored next
//! to the source pages under `zh-cn/`, so image references are rewritten to
//! `<context>/screenshots/<file>.png` with the context moved to `zh-cn`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;

const TRANSLATED_SEGMENT: &str = "/en-us/";
const SOURCE_SEGMENT: &str = "/zh-cn/";

static SCREENSHOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"screenshots/([0-9\-]+\.png)").expect("valid screenshot path regex")
});
static NESTED_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/.+/([0-9\-]+\.png)").expect("valid nested image path regex"));

/// Rewrites screenshot references of `source` relative to `context`, the
/// directory of the document being processed.
pub fn rewrite_asset_paths(source: &str, context: &str) -> String {
    let context = context.replace(TRANSLATED_SEGMENT, SOURCE_SEGMENT);
    let to_screenshot = |caps: &Captures<'_>| {
        Path::new(&context)
            .join("screenshots")
            .join(&caps[1])
            .to_string_lossy()
            .into_owned()
    };

    let rewritten = SCREENSHOT_RE.replace_all(source, to_screenshot);
    NESTED_IMAGE_RE
        .replace_all(&rewritten, to_screenshot)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::rewrite_asset_paths;

    #[test]
    fn relative_screenshot_moves_to_source_language() {
        let rewritten = rewrite_asset_paths(
            "![shot](screenshots/2023-01-01.png)",
            "/site/docs/en-us/HTML",
        );
        assert_eq!(
            rewritten,
            "![shot](/site/docs/zh-cn/HTML/screenshots/2023-01-01.png)"
        );
    }

    #[test]
    fn absolute_image_path_is_rebased() {
        let rewritten = rewrite_asset_paths("![x](/static/img/12-34.png)", "/docs/zh-cn/CSS");
        assert_eq!(rewritten, "![x](/docs/zh-cn/CSS/screenshots/12-34.png)");
    }

    #[test]
    fn unrelated_images_are_untouched() {
        let source = "![logo](logo.png) and ![b](/a/b/cover.png)";
        assert_eq!(rewrite_asset_paths(source, "/docs/zh-cn/CSS"), source);
    }
}
