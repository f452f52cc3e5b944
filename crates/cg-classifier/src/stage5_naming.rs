//! Stage 5: Filename inference.

use cg_core::sanitize_filename;
use regex::Regex;
use std::sync::LazyLock;

/// Preceding labels considered when looking for a filename.
pub const MAX_LABELS: usize = 3;

static RE_HEADER_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(
    r"^(?://|#|<!--|;)\s*([a-zA-Z0-9_\-.]+\.[a-zA-Z0-9]+)\b"
).unwrap());

/// `// main.rs`, `# setup.py`, `<!-- index.html -->`, `; boot.asm` on the
/// first line, accepted only when its extension matches `extension`.
pub fn from_header_comment(content: &str, extension: &str) -> Option<String> {
    let first = content.split('\n').next()?.trim();
    let name = RE_HEADER_COMMENT.captures(first)?.get(1)?.as_str();
    let found_ext = name.rsplit('.').next()?;
    (found_ext == extension).then(|| name.to_string())
}

/// Search a label text for `something.<extension>`, either as a bare token or
/// as the trailing segment after the last `:`.
pub fn from_label(label: &str, extension: &str) -> Option<String> {
    let pattern = format!(r"(?i)\b([\w\-.]+\.{})\b", regex::escape(extension));
    if let Ok(re) = Regex::new(&pattern) {
        if let Some(m) = re.captures(label).and_then(|c| c.get(1)) {
            return Some(m.as_str().to_string());
        }
    }

    if label.contains(':') {
        let candidate = label.rsplit(':').next().unwrap_or_default().trim();
        let suffix = format!(".{}", extension.to_lowercase());
        if candidate.to_lowercase().ends_with(&suffix) {
            return Some(candidate.to_string());
        }
    }
    None
}

/// Header comment first, then the nearest [`MAX_LABELS`] labels.
pub fn infer_filename<'a>(
    content: &str,
    labels: impl IntoIterator<Item = &'a str>,
    extension: &str,
) -> Option<String> {
    from_header_comment(content, extension).or_else(|| {
        labels
            .into_iter()
            .take(MAX_LABELS)
            .find_map(|label| from_label(label, extension))
    })
}

pub fn synthesized_name(position_index: usize, extension: &str) -> String {
    format!("snippet_{}.{}", position_index as u128 + 1, extension)
}

/// Final filename: an inferred name that survives sanitizing, else the
/// synthesized `snippet_<n>.<ext>`. The flag reports which one was used.
pub fn resolve_filename(inferred: Option<String>, position_index: usize, extension: &str) -> (String, bool) {
    match inferred.map(|n| sanitize_filename(&n)).filter(|n| !n.is_empty()) {
        Some(name) => (name, false),
        None => (synthesized_name(position_index, extension), true),
    }
}
