use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Persisted user settings. Every key is optional on import; missing keys
/// take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_detect: bool,
    pub stream_detect: bool,
    pub remove_line_numbers: bool,
    pub smart_naming: bool,
    pub default_extension: String,
    pub dedup_content: bool,
    pub auto_extension: bool,
    pub detect_lang: bool,
    pub min_content_len: usize,
    /// Consumed only by the download collaborator.
    pub ask_location: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_detect: true,
            stream_detect: true,
            remove_line_numbers: true,
            smart_naming: true,
            default_extension: "txt".into(),
            dedup_content: true,
            auto_extension: true,
            detect_lang: true,
            min_content_len: 200,
            ask_location: true,
        }
    }
}

impl Settings {
    /// Import settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if settings.default_extension.trim().is_empty() {
            settings.default_extension = Settings::default().default_extension;
        }
        Ok(settings)
    }

    /// Export settings as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Derive the immutable configuration for one classification pass.
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            noise_enabled: true,
            strip_line_numbers: self.remove_line_numbers,
            infer_filename: self.smart_naming,
            default_extension: self.default_extension.trim().trim_start_matches('.').to_string(),
            dedup_enabled: self.dedup_content,
            detect_language: self.detect_lang,
            min_content_length: self.min_content_len,
        }
    }
}

/// Classification configuration, fixed for the duration of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub noise_enabled: bool,
    pub strip_line_numbers: bool,
    pub infer_filename: bool,
    pub default_extension: String,
    pub dedup_enabled: bool,
    pub detect_language: bool,
    pub min_content_length: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Settings::default().classifier_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_schema() {
        let s = Settings::default();
        assert!(s.auto_detect && s.stream_detect && s.remove_line_numbers);
        assert!(s.smart_naming && s.dedup_content && s.detect_lang && s.ask_location);
        assert_eq!(s.default_extension, "txt");
        assert_eq!(s.min_content_len, 200);
    }

    #[test]
    fn test_partial_import_fills_defaults() {
        let s = Settings::from_json(r#"{"minContentLen": 50, "smartNaming": false}"#).unwrap();
        assert_eq!(s.min_content_len, 50);
        assert!(!s.smart_naming);
        assert!(s.dedup_content);
        assert_eq!(s.default_extension, "txt");
    }

    #[test]
    fn test_blank_extension_falls_back() {
        let s = Settings::from_json(r#"{"defaultExtension": "  "}"#).unwrap();
        assert_eq!(s.default_extension, "txt");
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_export_uses_camel_case() {
        let json = Settings::default().to_json_pretty().unwrap();
        assert!(json.contains("\"removeLineNumbers\": true"));
        assert!(json.contains("\"minContentLen\": 200"));
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back, Settings::default());
    }

    #[test]
    fn test_classifier_config_mapping() {
        let s = Settings {
            remove_line_numbers: false,
            dedup_content: false,
            default_extension: ".md".into(),
            ..Settings::default()
        };
        let c = s.classifier_config();
        assert!(c.noise_enabled);
        assert!(!c.strip_line_numbers);
        assert!(!c.dedup_enabled);
        assert_eq!(c.default_extension, "md");
    }
}
