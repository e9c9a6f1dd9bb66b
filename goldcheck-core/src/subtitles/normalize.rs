//! Cue text normalization.

use unicode_normalization::UnicodeNormalization;

/// Characters that may trail terminal punctuation.
const CLOSERS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', ')', ']', '\u{00BB}'];
const TERMINALS: &[char] = &['.', '!', '?', '\u{2026}'];

/// NFC, LF line endings, runs of whitespace collapsed to one space within each
/// line, lines trimmed. Blank lines at either end are dropped; interior blank
/// lines are kept because they still render.
pub fn normalize_text(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    let lines: Vec<String> = composed
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    let Some(first) = lines.iter().position(|line| !line.is_empty()) else {
        return String::new();
    };
    let last = lines.iter().rposition(|line| !line.is_empty()).unwrap_or(first);
    lines[first..=last].join("\n")
}

/// Inner text of a `[...]` cue such as `[DOOR SLAMS]`.
pub fn bracketed_inner(text: &str) -> Option<&str> {
    text.strip_prefix('[')?.strip_suffix(']')
}

/// Characters counted toward reading speed.
pub fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// The first alphanumeric character is not a lower-case letter.
pub fn starts_capitalized(text: &str) -> bool {
    text.chars()
        .find(|c| c.is_alphanumeric())
        .is_none_or(|c| !c.is_lowercase())
}

/// Ends with `.`, `!`, `?` or an ellipsis, ignoring closing quotes/brackets.
pub fn ends_with_terminal(text: &str) -> bool {
    text.trim_end_matches(|c: char| CLOSERS.contains(&c) || c.is_whitespace())
        .ends_with(TERMINALS)
}
