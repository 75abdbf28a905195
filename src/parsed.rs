//! The result of one parse: override and file maps, plus lookup and listing.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::merge::deep_merge;
use crate::types::ConfigMap;

/// Configuration collected from the command line.
///
/// `options` holds the typed override flags; `files` holds the merged
/// config file sections. They are kept apart so the application decides how
/// to combine them; [`layered`](Self::layered) gives the usual answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedConfig {
    pub options: ConfigMap,
    pub files: ConfigMap,
}

impl ParsedConfig {
    /// Deep-merge `options` on top of `files`: overrides beat file values.
    pub fn layered(&self) -> ConfigMap {
        let mut merged = self.files.clone();
        deep_merge(&mut merged, self.options.clone());
        merged
    }

    /// Look up a dotted key in the layered view.
    pub fn get(&self, dotted_key: &str) -> Option<Value> {
        map_get(&self.layered(), dotted_key).cloned()
    }

    /// All layered leaves as dotted key / display value pairs, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let layered = self.layered();
        let mut entries: Vec<(String, String)> = flatten(&layered)
            .into_iter()
            .map(|(key, value)| (key, format_value(value)))
            .collect();
        entries.sort();
        entries
    }

    /// Emit every layered entry as an `info` event.
    pub fn log_entries(&self) {
        for (key, value) in self.entries() {
            tracing::info!("{key}: {value}");
        }
    }
}

impl fmt::Display for ParsedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}

/// Navigate a map by dotted key path (e.g. `"database.url"`).
pub fn map_get<'a>(map: &'a ConfigMap, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let obj = match path {
        Some(path) => {
            let mut current = map;
            for segment in path.split('.') {
                current = current.get(segment)?.as_object()?;
            }
            current
        }
        None => map,
    };

    obj.get(leaf)
}

/// Flatten nested objects into dotted leaf paths. Empty objects and arrays
/// are leaves.
pub fn flatten(map: &ConfigMap) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    flatten_into(map, "", &mut out);
    out
}

fn flatten_into<'a>(map: &'a ConfigMap, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(child, &dotted, out),
            leaf => out.push((dotted, leaf)),
        }
    }
}

/// Format a JSON value for display. Strings print bare.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(options: Value, files: Value) -> ParsedConfig {
        ParsedConfig {
            options: options.as_object().cloned().unwrap(),
            files: files.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn layered_options_beat_files() {
        let config = parsed(
            json!({"server": {"port": 9999}}),
            json!({"server": {"port": 80, "host": "h"}, "name": "n"}),
        );
        assert_eq!(
            Value::Object(config.layered()),
            json!({"server": {"port": 9999, "host": "h"}, "name": "n"})
        );
    }

    #[test]
    fn layered_leaves_parts_unchanged() {
        let config = parsed(json!({"a": 2}), json!({"a": 1}));
        let _ = config.layered();
        assert_eq!(config.files["a"], json!(1));
        assert_eq!(config.options["a"], json!(2));
    }

    #[test]
    fn get_flat_and_nested() {
        let config = parsed(json!({"db": {"url": "pg://"}}), json!({"port": 1}));
        assert_eq!(config.get("db.url"), Some(json!("pg://")));
        assert_eq!(config.get("port"), Some(json!(1)));
        assert_eq!(config.get("db"), Some(json!({"url": "pg://"})));
    }

    #[test]
    fn get_missing_or_through_scalar() {
        let config = parsed(json!({"port": 1}), json!({}));
        assert_eq!(config.get("nope"), None);
        assert_eq!(config.get("port.inner"), None);
    }

    #[test]
    fn entries_are_sorted_dotted_leaves() {
        let config = parsed(
            json!({"z": true, "a": {"b": {"c": "x"}, "list": [1, 2]}}),
            json!({"empty": {}}),
        );
        assert_eq!(
            config.entries(),
            vec![
                ("a.b.c".to_string(), "x".to_string()),
                ("a.list".to_string(), "[1,2]".to_string()),
                ("empty".to_string(), "{}".to_string()),
                ("z".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn display_lists_entries() {
        let config = parsed(json!({"port": 3000}), json!({"host": "localhost"}));
        assert_eq!(config.to_string(), "host = localhost\nport = 3000");
    }

    #[test]
    fn display_empty_is_empty() {
        assert_eq!(ParsedConfig::default().to_string(), "");
    }

    #[test]
    fn serializes_both_maps() {
        let config = parsed(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"options": {"a": 1}, "files": {"b": 2}})
        );
    }
}
