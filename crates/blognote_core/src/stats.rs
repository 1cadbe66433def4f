//! Document statistics (lines, words, characters) and their totals.
//!
//! # Invariants
//! - `lines` counts `\n`-delimited segments, so empty text has one line.
//! - `characters` counts Unicode scalar values.
//! - Backticks never join or split words: they are replaced by spaces
//!   before counting.

/// Statistics of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
}

impl DocumentStats {
    pub fn measure(text: &str) -> Self {
        Self {
            lines: text.split('\n').count(),
            words: count_words(text),
            characters: text.chars().count(),
        }
    }
}

/// Running totals over a set of documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsTotals {
    pub count: usize,
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
}

impl StatsTotals {
    pub fn add(&mut self, stats: &DocumentStats) {
        self.count += 1;
        self.lines += stats.lines;
        self.words += stats.words;
        self.characters += stats.characters;
    }

    pub fn add_text(&mut self, text: &str) {
        self.add(&DocumentStats::measure(text));
    }

    /// Summary sentence including the word count.
    pub fn summary(&self) -> String {
        format!(
            "The repository holds `{}` articles, `{}` lines, `{}` words and `{}` characters in total.",
            self.count, self.lines, self.words, self.characters
        )
    }

    /// Summary sentence without the word count, used by the overview page.
    pub fn summary_without_words(&self) -> String {
        format!(
            "The repository holds {} articles, {} lines and {} characters in total.",
            self.count, self.lines, self.characters
        )
    }
}

/// Counts words in mixed CJK/latin prose.
///
/// Every CJK ideograph, kana or hangul syllable is one word; every maximal
/// run of other alphanumeric characters (plus `_` and inner apostrophes) is
/// one word.
pub fn count_words(text: &str) -> usize {
    let mut words = 0;
    let mut in_word = false;
    for ch in text.chars() {
        let ch = if ch == '`' { ' ' } else { ch };
        if is_cjk(ch) {
            words += 1;
            in_word = false;
        } else if ch.is_alphanumeric() || ch == '_' || (in_word && ch == '\'') {
            if !in_word {
                words += 1;
                in_word = true;
            }
        } else {
            in_word = false;
        }
    }
    words
}

fn is_cjk(ch: char) -> bool {
    matches!(
        ch as u32,
        0x3040..=0x30FF       // hiragana, katakana
            | 0x3400..=0x4DBF // CJK extension A
            | 0x4E00..=0x9FFF // CJK unified ideographs
            | 0xAC00..=0xD7AF // hangul syllables
            | 0xF900..=0xFAFF // CJK compatibility ideographs
            | 0x20000..=0x2A6DF
    )
}

#[cfg(test)]
mod tests {
    use super::{count_words, DocumentStats, StatsTotals};

    #[test]
    fn counts_latin_words_by_runs() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("foo"), 1);
        assert_eq!(count_words("  don't   stop_me now\n"), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn counts_each_cjk_character() {
        assert_eq!(count_words("前端性能"), 4);
        assert_eq!(count_words("使用Rust编写"), 5);
    }

    #[test]
    fn backticks_separate_inline_code() {
        assert_eq!(count_words("call`foo`now"), 3);
        assert_eq!(count_words("```rust\nfn main() {}\n```"), 3);
    }

    #[test]
    fn measure_counts_segments_and_scalars() {
        let stats = DocumentStats::measure("a\nb\n");
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.characters, 4);
        assert_eq!(DocumentStats::measure("").lines, 1);
        assert_eq!(DocumentStats::measure("中文").characters, 2);
    }

    #[test]
    fn totals_accumulate() {
        let mut totals = StatsTotals::default();
        totals.add_text("hello world");
        totals.add_text("foo");
        assert_eq!(totals.count, 2);
        assert_eq!(totals.words, 3);
        assert_eq!(totals.lines, 2);
        assert_eq!(totals.characters, 14);
        assert!(totals.summary().contains("`2` articles"));
    }
}
