//! Editor settings
//!
//! One explicit settings value, loaded once and passed to whatever needs it.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// Conventional location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";

/// Settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder holding one CSV file per node-type category
    pub default_node_types_folder: PathBuf,
    /// Folder holding one subfolder of tree files per category
    pub default_json_folder: PathBuf,
    /// Length of generated node ids
    pub default_id_size: usize,
    /// Tree categories every collection starts with
    pub default_collection_categories: Vec<String>,
    /// Propagate role subtrees into referencing trees on save
    pub auto_update_roles: bool,
    /// Log file; stderr when unset
    pub logfile_name: Option<PathBuf>,
}

impl Settings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With node types folder
    #[inline]
    #[must_use]
    pub fn with_node_types_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_node_types_folder = path.into();
        self
    }

    /// With json folder
    #[inline]
    #[must_use]
    pub fn with_json_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_json_folder = path.into();
        self
    }

    /// With id size
    #[inline]
    #[must_use]
    pub fn with_id_size(mut self, size: usize) -> Self {
        self.default_id_size = size;
        self
    }

    /// With log file
    #[inline]
    #[must_use]
    pub fn with_logfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.logfile_name = Some(path.into());
        self
    }

    /// Read settings from a JSON file; absent keys keep their defaults
    ///
    /// # Errors
    /// Returns [`SettingsError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SettingsError::io_error(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write settings as pretty-printed JSON with sorted keys
    ///
    /// # Errors
    /// Returns [`SettingsError`] on IO failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io_error(parent, e))?;
        }
        // Round trip through Value so keys come out sorted.
        let value = serde_json::to_value(self)?;
        let content = serde_json::to_string_pretty(&value)?;
        fs::write(path, content + "\n").map_err(|e| SettingsError::io_error(path, e))
    }

    /// Value of a named setting
    ///
    /// # Errors
    /// Returns [`SettingsError::NotFound`] for an unknown name.
    pub fn query(&self, name: &str) -> Result<Value, SettingsError> {
        let Value::Object(mut map) = serde_json::to_value(self)? else {
            return Err(SettingsError::NotFound(name.to_string()));
        };
        map.remove(name).ok_or_else(|| {
            error!(setting = name, "invalid setting queried");
            SettingsError::NotFound(name.to_string())
        })
    }

    /// Replace a named setting
    ///
    /// # Errors
    /// Returns [`SettingsError::NotFound`] for an unknown name and
    /// [`SettingsError::Json`] if `value` has the wrong type. `self` is
    /// unchanged on error.
    pub fn alter(&mut self, name: &str, value: Value) -> Result<(), SettingsError> {
        let Value::Object(mut map) = serde_json::to_value(&*self)? else {
            return Err(SettingsError::NotFound(name.to_string()));
        };
        let Some(slot) = map.get_mut(name) else {
            error!(setting = name, "invalid setting altered");
            return Err(SettingsError::NotFound(name.to_string()));
        };
        *slot = value;
        *self = serde_json::from_value(Value::Object(map))?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_node_types_folder: PathBuf::from("config/node_types"),
            default_json_folder: PathBuf::from("json"),
            default_id_size: 8,
            default_collection_categories: ["strategies", "tactics", "roles", "keeper"]
                .into_iter()
                .map(String::from)
                .collect(),
            auto_update_roles: false,
            logfile_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_id_size, 8);
        assert_eq!(settings.default_collection_categories.len(), 4);
        assert_eq!(settings.logfile_name, None);
    }

    #[test]
    fn query_known_and_unknown() {
        let settings = Settings::new().with_id_size(12);
        assert_eq!(settings.query("default_id_size").unwrap(), json!(12));
        assert!(matches!(
            settings.query("colour"),
            Err(SettingsError::NotFound(ref name)) if name == "colour"
        ));
    }

    #[test]
    fn alter_type_checks() {
        let mut settings = Settings::default();
        settings.alter("default_json_folder", json!("trees")).unwrap();
        assert_eq!(settings.default_json_folder, PathBuf::from("trees"));

        assert!(matches!(
            settings.alter("default_id_size", json!("big")),
            Err(SettingsError::Json(_))
        ));
        assert_eq!(settings.default_id_size, 8);
        assert!(matches!(
            settings.alter("nope", json!(1)),
            Err(SettingsError::NotFound(_))
        ));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.json");
        let settings = Settings::new()
            .with_json_folder("trees")
            .with_logfile("bte.log");
        settings.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let auto = content.find("auto_update_roles").unwrap();
        let logfile = content.find("logfile_name").unwrap();
        assert!(auto < logfile);
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"default_id_size": 5}"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_id_size, 5);
        assert_eq!(settings.default_json_folder, PathBuf::from("json"));
    }
}
