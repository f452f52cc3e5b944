//! Stage 1: Extraction of the visible text of a raw block.

use cg_core::CandidateBlock;
use regex::Regex;
use std::sync::LazyLock;

static RE_GUTTER_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*1\s*\n\s*2\s*\n").unwrap());
static RE_GUTTER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[0-9]+[ \t]*").unwrap());

/// Characters that render as nothing.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Normalize line endings and whitespace oddities, drop invisible characters.
pub fn visible_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !INVISIBLE.contains(c))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect()
}

/// True when the text opens with a bare `1`, `2` line-number gutter.
pub fn has_gutter(text: &str) -> bool {
    RE_GUTTER_START.is_match(text)
}

/// Remove a leading run of digits from every line.
pub fn strip_gutter(text: &str) -> String {
    RE_GUTTER_LINE.replace_all(text, "").into_owned()
}

/// Extract the text of a block. Hint text never ends up in the output.
pub fn extract(block: &CandidateBlock) -> String {
    let text = visible_text(&block.raw_text);
    if !block.from_code_element && has_gutter(&text) {
        strip_gutter(&text)
    } else {
        text
    }
}
