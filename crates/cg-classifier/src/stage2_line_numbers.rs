//! Stage 2: Line-number stripping by majority vote over the leading lines.

use regex::Regex;
use std::sync::LazyLock;

/// Non-blank lines inspected when voting.
pub const INSPECT_LINES: usize = 15;

static RE_NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[0-9]+\s").unwrap());
static RE_NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[0-9]+\s+").unwrap());

/// Count `(numbered, inspected)` over the first [`INSPECT_LINES`] non-blank lines.
pub fn vote(text: &str) -> (usize, usize) {
    text.split('\n')
        .filter(|l| !l.trim().is_empty())
        .take(INSPECT_LINES)
        .fold((0, 0), |(numbered, inspected), line| {
            let hit = RE_NUMBERED.is_match(line) as usize;
            (numbered + hit, inspected + 1)
        })
}

/// True when more than half of the inspected lines start with a number.
pub fn has_line_numbers(text: &str) -> bool {
    let (numbered, inspected) = vote(text);
    inspected > 0 && numbered * 2 > inspected
}

/// Strip one leading `digits+whitespace` prefix from every line, but only when
/// the majority rule holds. Otherwise the text is returned untouched.
pub fn strip_line_numbers(text: &str) -> String {
    if !has_line_numbers(text) {
        return text.to_string();
    }
    text.split('\n')
        .map(|line| RE_NUMBER_PREFIX.replace(line, ""))
        .collect::<Vec<_>>()
        .join("\n")
}
