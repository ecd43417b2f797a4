use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONFIG_FILE: &str = ".emacs-navigator.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigatorConfig {
    /// Editor used when a request names no view kind.
    pub default_view_kind: String,
    /// Extra editor kinds → file extensions they accept (empty = any file).
    pub view_kinds: HashMap<String, Vec<String>>,
    pub minimum_visible_lines: usize,
    pub viewport_height: usize,
    /// Persistence slots of tool windows the host registers at start-up.
    pub tool_windows: Vec<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            default_view_kind: "text".to_string(),
            view_kinds: HashMap::new(),
            minimum_visible_lines: 1,
            viewport_height: 40,
            tool_windows: Vec::new(),
            log_file: None,
        }
    }
}

impl NavigatorConfig {
    /// Read `.emacs-navigator.json` from `project_root`, or defaults if absent.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Parsing {}", path.display()))
    }

    /// Overlay the keys present in `overrides` (e.g. LSP initializationOptions).
    pub fn merged_with(&self, overrides: &Value) -> Result<Self> {
        let Some(fields) = overrides.as_object() else {
            return Ok(self.clone());
        };

        let mut base = serde_json::to_value(self)?;
        if let Some(obj) = base.as_object_mut() {
            for (key, value) in fields {
                obj.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(base).context("Applying configuration overrides")
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(crate::util::log::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NavigatorConfig::load(dir.path()).unwrap();
        assert_eq!(config, NavigatorConfig::default());
        assert_eq!(config.minimum_visible_lines, 1);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "viewKinds": { "designer": ["html"] }, "viewportHeight": 10 }"#,
        )
        .unwrap();

        let config = NavigatorConfig::load(dir.path()).unwrap();
        assert_eq!(config.viewport_height, 10);
        assert_eq!(config.view_kinds["designer"], vec!["html".to_string()]);
        assert_eq!(config.default_view_kind, "text");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ nope").unwrap();
        assert!(NavigatorConfig::load(dir.path()).is_err());
    }

    #[test]
    fn overrides_replace_only_given_keys() {
        let config = NavigatorConfig::default()
            .merged_with(&json!({ "minimumVisibleLines": 3, "toolWindows": ["outline"] }))
            .unwrap();
        assert_eq!(config.minimum_visible_lines, 3);
        assert_eq!(config.tool_windows, vec!["outline".to_string()]);
        assert_eq!(config.viewport_height, 40);

        let unchanged = NavigatorConfig::default().merged_with(&Value::Null).unwrap();
        assert_eq!(unchanged, NavigatorConfig::default());
    }
}
