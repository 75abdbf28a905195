//! Parse `path=value` overrides and write them into a nested [`ConfigMap`].
//!
//! `"database.url=pg://"` becomes `{"database": {"url": "pg://"}}`. Entries
//! are applied in order, so when two entries target the same path the later
//! one wins.

use serde_json::{Map, Value};

use crate::cast::cast_value;
use crate::error::ClapscriptError;
use crate::types::{ConfigMap, OverrideEntry, OverrideOrigin, ValueKind};

/// Split a raw `path=value` string at its only `=`.
///
/// The input is trimmed first. Both sides must be non-empty, the value may
/// not contain another `=`, and every dot-separated segment of the path must
/// be non-empty.
pub fn parse_override(raw: &str) -> Result<(&str, &str), ClapscriptError> {
    let malformed = || ClapscriptError::MalformedOverride {
        raw: raw.to_string(),
    };

    let (path, value) = raw.trim().split_once('=').ok_or_else(malformed)?;
    if path.is_empty()
        || value.is_empty()
        || value.contains('=')
        || path.split('.').any(str::is_empty)
    {
        return Err(malformed());
    }
    Ok((path, value))
}

/// Parse and cast one override flag value.
pub fn parse_typed_override(raw: &str, kind: ValueKind) -> Result<OverrideEntry, ClapscriptError> {
    let (path, value) = parse_override(raw)?;
    Ok(OverrideEntry {
        path: path.to_string(),
        value: cast_value(kind, value)?,
        origin: None,
    })
}

/// Set `value` at the location named by `segments`, creating intermediate
/// objects as needed.
///
/// The leaf is overwritten unconditionally. An intermediate segment that
/// already holds a non-object value is a [`ClapscriptError::PathConflict`].
pub fn set_nested(
    map: &mut ConfigMap,
    value: Value,
    segments: &[&str],
) -> Result<(), ClapscriptError> {
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(ClapscriptError::MalformedOverride { raw: String::new() });
    };
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ClapscriptError::MalformedOverride {
            raw: segments.join("."),
        });
    }

    // A conflict can only be found along the already-existing prefix. Once a
    // level is created everything below it is fresh, so failing never leaves
    // a half-built branch behind.
    let mut current = map;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(child) => child,
            _ => {
                return Err(ClapscriptError::PathConflict {
                    path: segments.join("."),
                    segment: segments[..=depth].join("."),
                });
            }
        };
    }

    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Apply one entry to `map`.
///
/// When the entry carries an [`OverrideOrigin`], a failure is reported as
/// [`ClapscriptError::FlagValue`] naming that flag and its raw text.
pub fn apply_override(map: &mut ConfigMap, entry: OverrideEntry) -> Result<(), ClapscriptError> {
    let OverrideEntry {
        path,
        value,
        origin,
    } = entry;
    let segments: Vec<&str> = path.split('.').collect();
    set_nested(map, value, &segments).map_err(|source| match origin {
        Some(OverrideOrigin { flag, raw }) => ClapscriptError::FlagValue {
            flag,
            raw,
            source: Box::new(source),
        },
        None => source,
    })?;
    tracing::debug!(%path, "applied config override");
    Ok(())
}

/// Build a nested map from overrides, applied in order.
pub fn overrides_to_map(
    entries: impl IntoIterator<Item = OverrideEntry>,
) -> Result<ConfigMap, ClapscriptError> {
    let mut map = ConfigMap::new();
    for entry in entries {
        apply_override(&mut map, entry)?;
    }
    Ok(map)
}

/// Split a raw `key=value` string into a flat pair.
///
/// Stricter than [`parse_override`]: neither side may contain `=`, and the
/// key is not interpreted as a path.
pub fn parse_key_value(raw: &str) -> Result<(String, String), ClapscriptError> {
    let trimmed = raw.trim();
    match trimmed.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() && !value.contains('=') => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(ClapscriptError::MalformedKeyValue {
            raw: raw.to_string(),
        }),
    }
}
