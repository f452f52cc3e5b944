//! Filename helpers shared by classification, the registry and downloads.

use chrono::{DateTime, Utc};

/// Replace characters illegal on common filesystems (`<>:"/\|?*` and
/// control characters 0-31) with `_`, then trim surrounding whitespace.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Filename for a multi-snippet archive download.
pub fn bundle_filename(now: DateTime<Utc>) -> String {
    format!("CodGatr_Bundle_{}.zip", now.timestamp_millis())
}

/// MIME type for a single-file download, keyed by extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "js" | "jsx" => "text/javascript",
        "ts" | "tsx" => "text/typescript",
        "html" => "text/html",
        "css" => "text/css",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" => "application/yaml",
        "md" => "text/markdown",
        "py" => "text/x-python",
        "sh" => "application/x-sh",
        "sql" => "application/sql",
        "zip" => "application/zip",
        _ => "text/plain",
    }
}
