//! Stage 3: Noise rejection by length floor and UI-chrome heuristics.

use cg_core::ClassifierConfig;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Decorative icon-glyph class token.
pub const ICON_MARKER: &str = ".codicon-";
/// Editor scaffold / theme tokens. Any occurrence marks the block as noise.
pub const SCAFFOLD_MARKERS: &[&str] = &["--vscode-", ".monaco-editor"];
/// Style-declaration tokens that signal leaked CSS when next to an icon.
pub const STYLE_MARKERS: &[&str] = &["content:", ":before"];

const MAX_MARKER_COUNT: usize = 2;
const MAX_MARKER_WEIGHT: f64 = 0.3;

static RE_CODE_STRUCTURE: LazyLock<Regex> = LazyLock::new(|| Regex::new(
    r"\b(?:function|const|let|var|class|import|export|return|if|for|while)\b|=>|[{}()]"
).unwrap());

/// Why a block was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    TooShort { len: usize, min: usize },
    ChromeDensity,
    EditorScaffold,
    StyleLeakage,
    StrayIcon,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::TooShort { len, min } => write!(f, "too short ({len} < {min})"),
            Self::ChromeDensity => write!(f, "ui chrome density"),
            Self::EditorScaffold => write!(f, "editor scaffold"),
            Self::StyleLeakage => write!(f, "css leakage"),
            Self::StrayIcon => write!(f, "stray icon glyph"),
        }
    }
}

fn chrome_markers() -> impl Iterator<Item = &'static str> {
    std::iter::once(ICON_MARKER).chain(SCAFFOLD_MARKERS.iter().copied())
}

/// Total occurrences of chrome markers and their aggregate character weight.
pub fn chrome_stats(text: &str) -> (usize, usize) {
    chrome_markers().fold((0, 0), |(count, weight), marker| {
        let n = text.matches(marker).count();
        (count + n, weight + n * marker.chars().count())
    })
}

/// Density rules: more than [`MAX_MARKER_COUNT`] markers, or markers making
/// up too much of the non-whitespace text. Marked lines never outnumber
/// markers, so a per-line majority rule adds nothing past the count limit.
pub fn is_chrome_dense(trimmed: &str) -> bool {
    let (count, weight) = chrome_stats(trimmed);
    if count == 0 {
        return false;
    }
    if count > MAX_MARKER_COUNT {
        return true;
    }

    let non_ws = trimmed.chars().filter(|c| !c.is_whitespace()).count();
    non_ws > 0 && weight as f64 / non_ws as f64 > MAX_MARKER_WEIGHT
}

pub fn has_code_structure(text: &str) -> bool {
    RE_CODE_STRUCTURE.is_match(text)
}

/// Run every rejection rule against normalized text. `None` means keep.
///
/// The length floor applies even when `noise_enabled` is off.
pub fn detect_noise(text: &str, config: &ClassifierConfig) -> Option<RejectReason> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(RejectReason::Empty);
    }

    let len = trimmed.chars().count();
    if len < config.min_content_length {
        return Some(RejectReason::TooShort { len, min: config.min_content_length });
    }

    if !config.noise_enabled {
        return None;
    }

    if is_chrome_dense(trimmed) {
        return Some(RejectReason::ChromeDensity);
    }
    if SCAFFOLD_MARKERS.iter().any(|m| trimmed.contains(m)) {
        return Some(RejectReason::EditorScaffold);
    }

    let has_icon = trimmed.contains(ICON_MARKER);
    if has_icon && STYLE_MARKERS.iter().any(|m| trimmed.contains(m)) {
        return Some(RejectReason::StyleLeakage);
    }
    if has_icon && !has_code_structure(trimmed) {
        return Some(RejectReason::StrayIcon);
    }
    None
}
