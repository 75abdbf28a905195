//! Config file loading.
//!
//! A config file is a UTF-8 JSON object. Only one of its top-level keys is
//! used: the first of the loader's *recognized keys* that the document
//! contains. That key must hold an object, the contributed section. All
//! other top-level keys are ignored.
//!
//! ```text
//! {
//!     "config": { "Foo": "bar" },    <- contributed with keys ["config"]
//!     "ignored": { "SDF": 1123 }
//! }
//! ```
//!
//! # Selection order
//!
//! The recognized key list is searched in **list order**, not document
//! order. With keys `["run_config", "config"]`, a document containing both
//! contributes its `run_config` section no matter which appears first in the
//! file.
//!
//! # Accumulation
//!
//! [`ConfigFileLoader::load_into`] folds files into one destination. The
//! first file's section becomes the destination; each later file is
//! deep-merged on top of it (see [`deep_merge`]), so the last file wins
//! when two files set the same leaf. A failing file leaves the destination
//! untouched.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ClapscriptError;
use crate::merge::deep_merge;
use crate::types::ConfigMap;

/// Recognized key list used when the application does not supply one.
pub const DEFAULT_CONFIG_KEYS: &[&str] = &["config"];

/// A section extracted from one config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSection {
    /// The file the section came from, made absolute where possible.
    pub path: PathBuf,
    /// The recognized key that selected the section.
    pub key: String,
    pub values: ConfigMap,
}

/// Read and parse a whole JSON document.
///
/// Fails with [`FileNotFound`](ClapscriptError::FileNotFound) unless `path`
/// is a regular file, and with [`MalformedJson`](ClapscriptError::MalformedJson)
/// if its contents do not parse.
pub fn load_document(path: &Path) -> Result<Value, ClapscriptError> {
    if !path.is_file() {
        return Err(ClapscriptError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ClapscriptError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ClapscriptError::MalformedJson {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pick the section named by the first recognized key present in `document`.
///
/// `path` is only used for error messages.
pub fn extract_section(
    document: Value,
    recognized_keys: &[String],
    path: &Path,
) -> Result<(String, ConfigMap), ClapscriptError> {
    let missing = || ClapscriptError::MissingConfigSection {
        path: path.to_path_buf(),
        keys: recognized_keys.to_vec(),
    };

    let Value::Object(mut top) = document else {
        return Err(missing());
    };
    let key = recognized_keys
        .iter()
        .find(|k| top.contains_key(k.as_str()))
        .ok_or_else(missing)?;

    match top.remove(key.as_str()) {
        Some(Value::Object(section)) => Ok((key.clone(), section)),
        _ => Err(ClapscriptError::InvalidConfigSection {
            path: path.to_path_buf(),
            key: key.clone(),
        }),
    }
}

/// Fold `section` into `dest`: the first section replaces an empty
/// destination, later ones are deep-merged on top.
pub fn accumulate(dest: &mut ConfigMap, section: ConfigMap) {
    if dest.is_empty() {
        *dest = section;
    } else {
        deep_merge(dest, section);
    }
}

/// Loads config files against an ordered list of recognized top-level keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileLoader {
    recognized_keys: Vec<String>,
}

impl Default for ConfigFileLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_KEYS.iter().copied())
    }
}

impl ConfigFileLoader {
    /// Create a loader. Keys are tried in the order given.
    pub fn new<I, S>(recognized_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recognized_keys: recognized_keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn recognized_keys(&self) -> &[String] {
        &self.recognized_keys
    }

    /// Load `path` and extract its section.
    pub fn load(&self, path: &Path) -> Result<ConfigSection, ClapscriptError> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let document = load_document(&path)?;
        let (key, values) = extract_section(document, &self.recognized_keys, &path)?;
        tracing::debug!(path = %path.display(), %key, "loaded config file");
        Ok(ConfigSection { path, key, values })
    }

    /// Load `path` and fold its section into `dest`.
    pub fn load_into(&self, dest: &mut ConfigMap, path: &Path) -> Result<(), ClapscriptError> {
        let section = self.load(path)?;
        accumulate(dest, section.values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{json_file, run_config_keys};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn default_keys_select_config() {
        let dir = TempDir::new().unwrap();
        let path = json_file(
            &dir,
            "a.json",
            r#"{"config": {"Foo": "bar"}, "ignored": {"SDF": 1123}}"#,
        );

        let mut dest = ConfigMap::new();
        ConfigFileLoader::default().load_into(&mut dest, &path).unwrap();
        assert_eq!(Value::Object(dest), json!({"Foo": "bar"}));
    }

    #[test]
    fn two_files_merge_last_wins() {
        let dir = TempDir::new().unwrap();
        let first = json_file(&dir, "1.json", r#"{"config": {"Foo": "bar", "bar": "Baz"}}"#);
        let second = json_file(
            &dir,
            "2.json",
            r#"{"config": {"bar": "sdfsdf", "baz": 123123}}"#,
        );

        let loader = ConfigFileLoader::default();
        let mut dest = ConfigMap::new();
        loader.load_into(&mut dest, &first).unwrap();
        loader.load_into(&mut dest, &second).unwrap();
        assert_eq!(
            Value::Object(dest),
            json!({"Foo": "bar", "bar": "sdfsdf", "baz": 123123})
        );
    }

    #[test]
    fn list_order_beats_document_order() {
        let dir = TempDir::new().unwrap();
        let path = json_file(
            &dir,
            "both.json",
            r#"{
                "config": {"Foo": "bar"},
                "ignored": {"SDF": 1123},
                "run_config": {"bar": "sdfsdfsdf"}
            }"#,
        );

        let section = ConfigFileLoader::new(["config", "run_config"])
            .load(&path)
            .unwrap();
        assert_eq!(section.key, "config");
        assert_eq!(Value::Object(section.values), json!({"Foo": "bar"}));

        let section = ConfigFileLoader::new(run_config_keys()).load(&path).unwrap();
        assert_eq!(section.key, "run_config");
        assert_eq!(Value::Object(section.values), json!({"bar": "sdfsdfsdf"}));
    }

    #[test]
    fn falls_through_to_later_key() {
        let dir = TempDir::new().unwrap();
        let path = json_file(&dir, "one.json", r#"{"config": {"Foo": "bar"}}"#);

        let section = ConfigFileLoader::new(run_config_keys()).load(&path).unwrap();
        assert_eq!(section.key, "config");
        assert_eq!(Value::Object(section.values), json!({"Foo": "bar"}));
    }

    #[test]
    fn malformed_json_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let path = json_file(&dir, "bad.json", r#"{"config": {"Foo": wer}}"#);

        let mut dest = json!({"kept": 1}).as_object().cloned().unwrap();
        let err = ConfigFileLoader::default()
            .load_into(&mut dest, &path)
            .unwrap_err();
        assert!(matches!(err, ClapscriptError::MalformedJson { .. }));
        assert_eq!(Value::Object(dest), json!({"kept": 1}));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ConfigFileLoader::default()
            .load(&dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, ClapscriptError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_document(dir.path()).unwrap_err();
        assert!(matches!(err, ClapscriptError::FileNotFound { .. }));
    }

    #[test]
    fn no_recognized_key_is_missing_section() {
        let dir = TempDir::new().unwrap();
        let path = json_file(&dir, "other.json", r#"{"settings": {"a": 1}}"#);

        let err = ConfigFileLoader::new(run_config_keys())
            .load(&path)
            .unwrap_err();
        match err {
            ClapscriptError::MissingConfigSection { keys, .. } => {
                assert_eq!(keys, vec!["run_config", "config"]);
            }
            other => panic!("Expected MissingConfigSection, got {other:?}"),
        }
    }

    #[test]
    fn top_level_array_is_missing_section() {
        let err = extract_section(json!([1, 2]), &["config".into()], Path::new("x.json"))
            .unwrap_err();
        assert!(matches!(err, ClapscriptError::MissingConfigSection { .. }));
    }

    #[test]
    fn scalar_section_is_invalid() {
        let err = extract_section(json!({"config": 3}), &["config".into()], Path::new("x.json"))
            .unwrap_err();
        assert!(matches!(err, ClapscriptError::InvalidConfigSection { .. }));
    }

    #[test]
    fn accumulate_first_section_replaces() {
        let mut dest = ConfigMap::new();
        accumulate(&mut dest, json!({"a": 1}).as_object().cloned().unwrap());
        assert_eq!(Value::Object(dest), json!({"a": 1}));
    }

    #[test]
    fn loaded_path_is_absolute() {
        let dir = TempDir::new().unwrap();
        let path = json_file(&dir, "abs.json", r#"{"config": {}}"#);
        let section = ConfigFileLoader::default().load(&path).unwrap();
        assert!(section.path.is_absolute());
        assert!(section.values.is_empty());
    }
}
