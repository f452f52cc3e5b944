//! Stage 4: Extension resolution from `language-*` / `lang-*` class hints.

use cg_core::{CandidateBlock, ClassifierConfig};

const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("javascript", "js"), ("js", "js"),
    ("typescript", "ts"), ("ts", "ts"),
    ("jsx", "jsx"), ("tsx", "tsx"),
    ("html", "html"), ("css", "css"),
    ("python", "py"), ("py", "py"),
    ("java", "java"),
    ("c", "c"), ("cpp", "cpp"), ("c++", "cpp"),
    ("csharp", "cs"), ("c#", "cs"),
    ("go", "go"),
    ("rust", "rs"),
    ("php", "php"),
    ("ruby", "rb"),
    ("swift", "swift"),
    ("kotlin", "kt"),
    ("sql", "sql"),
    ("json", "json"),
    ("xml", "xml"),
    ("yaml", "yaml"), ("yml", "yaml"),
    ("markdown", "md"), ("md", "md"),
    ("shell", "sh"), ("bash", "sh"), ("sh", "sh"),
    ("powershell", "ps1"),
    ("dockerfile", "dockerfile"),
    ("plaintext", "txt"), ("text", "txt"),
];

const TAG_PREFIXES: &[&str] = &["language-", "lang-"];

/// Map a language identifier to its file extension (case-insensitive).
pub fn extension_for(language: &str) -> Option<&'static str> {
    let language = language.to_lowercase();
    LANGUAGE_MAP
        .iter()
        .find(|(id, _)| *id == language)
        .map(|(_, ext)| *ext)
}

/// Extension named by a single class token, if it is a recognized tag.
pub fn tag_extension(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    TAG_PREFIXES
        .iter()
        .find_map(|p| lower.strip_prefix(p))
        .and_then(extension_for)
}

/// First recognized tag across the block's class hints wins; otherwise the
/// configured default.
pub fn resolve_extension(block: &CandidateBlock, config: &ClassifierConfig) -> String {
    if config.detect_language {
        let found = block
            .class_tokens()
            .flat_map(str::split_whitespace)
            .find_map(tag_extension);
        if let Some(ext) = found {
            return ext.to_string();
        }
    }
    config.default_extension.clone()
}
