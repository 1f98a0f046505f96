//! User configuration.
//!
//! Loaded from a TOML or JSON file, or sent by the client as JSON. Keys are
//! camelCase; anything missing takes its default.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::scope::DEFAULT_MODULES;

/// Language ids analyzed without extra configuration.
pub const BUILTIN_LANGUAGES: &[&str] = &["javascript", "javascriptreact", "typescript", "typescriptreact"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Extra language ids mapped to one of the built-in ones.
    pub included_languages: HashMap<String, String>,
    /// Module specifiers that export the style API.
    pub alias_module_names: Vec<String>,
    pub use_rem_for_font_size: bool,
    pub hover: bool,
    pub suggestions: bool,
    pub color_decorators: bool,
    /// Program plus arguments that turn source on stdin into a JSON tree.
    pub parser_command: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            included_languages: HashMap::new(),
            alias_module_names: DEFAULT_MODULES.iter().map(|m| m.to_string()).collect(),
            use_rem_for_font_size: false,
            hover: true,
            suggestions: true,
            color_decorators: true,
            parser_command: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let settings = if is_json {
            Self::from_json(&contents)?
        } else {
            toml::from_str(&contents)
                .with_context(|| format!("Invalid TOML settings in {}", path.display()))?
        };
        log::info!("[Settings] Loaded {}", path.display());
        Ok(settings)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid JSON settings")
    }

    pub fn supports_language(&self, language_id: &str) -> bool {
        BUILTIN_LANGUAGES.contains(&language_id) || self.included_languages.contains_key(language_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.hover && settings.suggestions && settings.color_decorators);
        assert_eq!(settings.alias_module_names, vec!["@stylexjs/stylex", "stylex"]);
        assert!(settings.supports_language("typescriptreact"));
        assert!(!settings.supports_language("css"));
    }

    #[test]
    fn test_load_toml_with_partial_keys() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "hover = false").unwrap();
        writeln!(file, "aliasModuleNames = [\"@acme/styles\"]").unwrap();
        writeln!(file, "[includedLanguages]").unwrap();
        writeln!(file, "vue = \"typescript\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(!settings.hover);
        assert!(settings.suggestions);
        assert_eq!(settings.alias_module_names, vec!["@acme/styles"]);
        assert!(settings.supports_language("vue"));
    }

    #[test]
    fn test_load_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"useRemForFontSize": true, "parserCommand": ["swc-json"]}}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(settings.use_rem_for_font_size);
        assert_eq!(settings.parser_command, Some(vec!["swc-json".to_string()]));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "hover = [").unwrap();
        assert!(Settings::load(file.path()).is_err());
        assert!(Settings::load(Path::new("/nonexistent/stylelens.toml")).is_err());
    }
}
