use std::path::PathBuf;

use thiserror::Error;

use crate::types::ValueKind;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ClapscriptError {
    #[error("Invalid override '{raw}' - value must be of the form 'section.*.key=value'")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(clapscript::malformed_override),
            help("write the override as a dotted path, '=', and a value, e.g. 'server.port=8080'")
        )
    )]
    MalformedOverride { raw: String },

    #[error("Invalid {kind} value '{raw}': {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::invalid_value)))]
    InvalidValue {
        kind: ValueKind,
        raw: String,
        reason: String,
    },

    #[error("Cannot set '{path}': '{segment}' already holds a non-object value")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(clapscript::path_conflict),
            help("an earlier override or config file already set a scalar on this path")
        )
    )]
    PathConflict { path: String, segment: String },

    #[error("invalid value '{raw}' for '{flag}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::flag_value)))]
    FlagValue {
        flag: String,
        raw: String,
        source: Box<ClapscriptError>,
    },

    #[error("File {path} does not exist")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::file_not_found)))]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::io)))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File {path} contains invalid config JSON data: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::malformed_json)))]
    MalformedJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Config file {path} must contain a top level config key - '{}'", .keys.join("', '"))]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(clapscript::missing_config_section))
    )]
    MissingConfigSection { path: PathBuf, keys: Vec<String> },

    #[error("Config key '{key}' in {path} must hold a JSON object")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(clapscript::invalid_config_section))
    )]
    InvalidConfigSection { path: PathBuf, key: String },

    #[error("Invalid value '{raw}' - value must be of the form 'key=value'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::malformed_key_value)))]
    MalformedKeyValue { raw: String },

    #[error("Failed to open log file {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::log_file)))]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Logging already initialized: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapscript::logging_init)))]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_override_names_raw_value() {
        let err = ClapscriptError::MalformedOverride {
            raw: "no-equals".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("no-equals"));
        assert!(msg.contains("section.*.key=value"));
    }

    #[test]
    fn invalid_value_names_kind() {
        let err = ClapscriptError::InvalidValue {
            kind: ValueKind::Integer,
            raw: "abc".into(),
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid integer value 'abc': invalid digit found in string"
        );
    }

    #[test]
    fn missing_section_lists_keys() {
        let err = ClapscriptError::MissingConfigSection {
            path: "/tmp/run.json".into(),
            keys: vec!["run_config".into(), "config".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/run.json"));
        assert!(msg.contains("'run_config', 'config'"));
    }

    #[test]
    fn flag_value_names_flag_and_raw() {
        let err = ClapscriptError::FlagValue {
            flag: "--integer-config-option <PATH=VALUE>".into(),
            raw: "a.b=2".into(),
            source: Box::new(ClapscriptError::PathConflict {
                path: "a.b".into(),
                segment: "a".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'a.b=2' for '--integer-config-option <PATH=VALUE>': \
             Cannot set 'a.b': 'a' already holds a non-object value"
        );
    }

    #[test]
    fn path_conflict_formats() {
        let err = ClapscriptError::PathConflict {
            path: "a.b.c".into(),
            segment: "b".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a.b.c"));
        assert!(msg.contains("'b'"));
    }
}
