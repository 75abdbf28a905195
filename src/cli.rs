//! Clap adapter for clapscript.
//!
//! This module is the **optional integration layer** between clapscript's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! Parsing is split in two:
//!
//! - **Per value.** Each flag occurrence goes through a
//!   [`TypedValueParser`]: [`OverrideParser`] checks the `path=value` shape
//!   and casts the value, [`ConfigFileParser`] loads the file and extracts
//!   its section. Any failure here is an ordinary clap usage error naming the
//!   flag and the raw value, and nothing has been written anywhere yet.
//! - **Per command line.** [`ConfigFlags::extract`] collects the parsed
//!   values from all flags, restores their command-line order from clap's
//!   indices, and folds them through the [`resolve`](crate::resolve) pipeline.
//!
//! Two integration paths share that machinery:
//!
//! - **[`ConfigArgs`]**: `#[command(flatten)]` it into a derive struct.
//!   Uses the default recognized key (`config`) and long flag names only.
//! - **[`ConfigFlags`]**: a runtime builder for apps that need their own
//!   recognized keys or the short flags (`-C -B -I -F -J -c`).

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches};

use crate::error::ClapscriptError;
use crate::file::{ConfigFileLoader, ConfigSection};
use crate::logging::LogArgs;
use crate::overrides::parse_typed_override;
use crate::parsed::ParsedConfig;
use crate::resolve::{ResolveInput, resolve};
use crate::types::{OverrideEntry, OverrideOrigin, ValueKind};

const CONFIG_FILE_ID: &str = "config_file";

struct OverrideFlag {
    kind: ValueKind,
    id: &'static str,
    long: &'static str,
    short: char,
    help: &'static str,
}

const OVERRIDE_FLAGS: [OverrideFlag; 5] = [
    OverrideFlag {
        kind: ValueKind::String,
        id: "config_option",
        long: "config-option",
        short: 'C',
        help: "Config option override, formatted like 'section.*.key=stringvalue'",
    },
    OverrideFlag {
        kind: ValueKind::Boolean,
        id: "boolean_config_option",
        long: "boolean-config-option",
        short: 'B',
        help: "Config option override, formatted like 'section.*.key=boolvalue'",
    },
    OverrideFlag {
        kind: ValueKind::Integer,
        id: "integer_config_option",
        long: "integer-config-option",
        short: 'I',
        help: "Config option override, formatted like 'section.*.key=intvalue'",
    },
    OverrideFlag {
        kind: ValueKind::Float,
        id: "float_config_option",
        long: "float-config-option",
        short: 'F',
        help: "Config option override, formatted like 'section.*.key=floatvalue'",
    },
    OverrideFlag {
        kind: ValueKind::Json,
        id: "json_config_option",
        long: "json-config-option",
        short: 'J',
        help: "Config option override supporting any json formatted value, \
               formatted like 'section.*.key=jsonvalue'",
    },
];

/// Turn a core error into a clap usage error that names the flag.
fn value_error(cmd: &Command, arg: Option<&Arg>, err: ClapscriptError) -> clap::Error {
    let message = match arg {
        Some(arg) => format!("invalid value for '{arg}': {err}\n"),
        None => format!("{err}\n"),
    };
    clap::Error::raw(ErrorKind::ValueValidation, message).with_cmd(cmd)
}

fn utf8_value<'a>(cmd: &Command, value: &'a OsStr) -> Result<&'a str, clap::Error> {
    value
        .to_str()
        .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))
}

/// Value parser for `path=value` overrides of one [`ValueKind`].
#[derive(Debug, Clone, Copy)]
pub struct OverrideParser {
    kind: ValueKind,
}

impl OverrideParser {
    pub fn new(kind: ValueKind) -> Self {
        Self { kind }
    }
}

impl TypedValueParser for OverrideParser {
    type Value = OverrideEntry;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let raw = utf8_value(cmd, value)?;
        let mut entry =
            parse_typed_override(raw, self.kind).map_err(|e| value_error(cmd, arg, e))?;
        // Applying the entry happens later, away from clap's own error context.
        entry.origin = arg.map(|arg| OverrideOrigin {
            flag: arg.to_string(),
            raw: raw.to_string(),
        });
        Ok(entry)
    }
}

/// Value parser that loads a config file and extracts its section.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileParser {
    loader: ConfigFileLoader,
}

impl ConfigFileParser {
    pub fn new(loader: ConfigFileLoader) -> Self {
        Self { loader }
    }
}

impl TypedValueParser for ConfigFileParser {
    type Value = ConfigSection;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let raw = utf8_value(cmd, value)?;
        let path = PathBuf::from(raw.trim());
        self.loader
            .load(&path)
            .map_err(|e| value_error(cmd, arg, e))
    }
}

/// Runtime builder for the config flags.
///
/// ```ignore
/// let flags = ConfigFlags::new().recognized_keys(["run_config", "config"]);
/// let matches = flags.augment(Command::new("run")).get_matches();
/// let parsed = flags.extract(&matches)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigFlags {
    loader: ConfigFileLoader,
    short_names: bool,
}

impl ConfigFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the recognized top-level keys for `--config-file` (default:
    /// `["config"]`). Earlier keys take precedence.
    pub fn recognized_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loader = ConfigFileLoader::new(keys);
        self
    }

    /// Also register the short flags `-C -B -I -F -J -c` (default: off).
    pub fn short_names(mut self, enabled: bool) -> Self {
        self.short_names = enabled;
        self
    }

    /// Register the six config flags on `cmd`.
    pub fn augment(&self, cmd: Command) -> Command {
        let mut cmd = cmd;
        for flag in &OVERRIDE_FLAGS {
            let mut arg = Arg::new(flag.id)
                .long(flag.long)
                .value_name("PATH=VALUE")
                .action(ArgAction::Append)
                .value_parser(OverrideParser::new(flag.kind))
                .help(flag.help);
            if self.short_names {
                arg = arg.short(flag.short);
            }
            cmd = cmd.arg(arg);
        }

        let mut file_arg = Arg::new(CONFIG_FILE_ID)
            .long("config-file")
            .value_name("FILE")
            .action(ArgAction::Append)
            .value_parser(ConfigFileParser::new(self.loader.clone()))
            .help("Config file containing JSON formatted overrides for default config values");
        if self.short_names {
            file_arg = file_arg.short('c');
        }
        cmd.arg(file_arg)
    }

    /// Fold the parsed flag values in `matches` into a [`ParsedConfig`].
    ///
    /// Overrides from all five typed flags are applied in the order they
    /// appeared on the command line, regardless of which flag carried them.
    pub fn extract(&self, matches: &ArgMatches) -> Result<ParsedConfig, ClapscriptError> {
        let mut indexed: Vec<(usize, OverrideEntry)> = Vec::new();
        for flag in &OVERRIDE_FLAGS {
            if let Some(values) = matches.try_get_many::<OverrideEntry>(flag.id).ok().flatten()
                && let Some(indices) = matches.indices_of(flag.id)
            {
                indexed.extend(indices.zip(values.cloned()));
            }
        }
        indexed.sort_by_key(|(index, _)| *index);

        let sections = matches
            .try_get_many::<ConfigSection>(CONFIG_FILE_ID)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        resolve(ResolveInput {
            overrides: indexed.into_iter().map(|(_, entry)| entry).collect(),
            sections,
        })
    }
}

/// Derive-friendly config flags, for `#[command(flatten)]`.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: ConfigArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigArgs {
    pub parsed: ParsedConfig,
}

impl ConfigArgs {
    pub fn into_parsed(self) -> ParsedConfig {
        self.parsed
    }
}

impl FromArgMatches for ConfigArgs {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        ConfigFlags::default()
            .extract(matches)
            .map(|parsed| Self { parsed })
            .map_err(|e| clap::Error::raw(ErrorKind::ValueValidation, format!("{e}\n")))
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

impl Args for ConfigArgs {
    fn augment_args(cmd: Command) -> Command {
        ConfigFlags::default().augment(cmd)
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Self::augment_args(cmd)
    }
}

/// Logging and config flags together: the common bundle for a script.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct ScriptArgs {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}
