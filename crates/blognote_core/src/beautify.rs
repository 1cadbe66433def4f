//! Punctuation beautifier for prose pasted from reference pages.
//!
//! Quotes and line breaks are dropped, full-width punctuation is normalized,
//! and every run of code-like ASCII characters is wrapped in backticks. The
//! result always ends with `。`.

const DROPPED: &[char] = &['\n', '\r', '“', '”', '"', '‘', '’', '\''];
const CODE_SYMBOLS: &str = "/-.@<>{}[]?#:;_+\\%|=$";
const CLAUSE_MARK: &str = "，";
const FULL_STOP: &str = "。";

fn normalize_punctuation(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for ch in text.chars().filter(|ch| !DROPPED.contains(ch)) {
        match ch {
            '（' => normalized.push('('),
            '）' => normalized.push(')'),
            ',' | '。' => normalized.push_str(CLAUSE_MARK),
            '；' => normalized.push(';'),
            '？' => normalized.push('?'),
            '！' => normalized.push('!'),
            '：' => normalized.push_str(": "),
            other => normalized.push(other),
        }
    }
    normalized
}

fn is_code_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch.is_whitespace() || CODE_SYMBOLS.contains(ch)
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Beautifies one paragraph of prose.
pub fn beautify(text: &str) -> String {
    let normalized = normalize_punctuation(text);
    let mut cells: Vec<String> = normalized.chars().map(String::from).collect();
    let mut in_code = false;

    for index in 0..cells.len() {
        let code = cells[index].chars().next().is_some_and(is_code_char);
        if code && !in_code {
            in_code = true;
            cells[index] = strip_whitespace(&format!("`{}", cells[index]));
        } else if !code && in_code {
            in_code = false;
            cells[index] = strip_whitespace(&format!("`{}", cells[index]));
            if index > 0 {
                cells[index - 1] = strip_whitespace(&cells[index - 1]);
            }
        }
    }

    if in_code {
        if let Some(last) = cells.last_mut() {
            *last = strip_whitespace(last);
        }
        cells.push("`".to_string());
    }

    if cells.last().is_some_and(|last| last == CLAUSE_MARK) {
        cells.pop();
    }
    cells.push(FULL_STOP.to_string());

    cells
        .concat()
        .replace("`，`", ", ")
        .replace("`，。", "`。")
}
