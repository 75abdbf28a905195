//! Reusable building blocks for command-line scripts: typed config override
//! flags, JSON config files with deep merge, and logging bootstrap.
//!
//! Clapscript adds a small set of flags to a clap command and turns them into
//! a nested JSON map the application can consume however it likes.
//!
//! ```ignore
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     script: clapscript::ScriptArgs,
//! }
//!
//! let cli = Cli::parse();
//! clapscript::init_logging(&cli.script.log)?;
//! let config = cli.script.config.parsed.layered();
//! ```
//!
//! # The flags
//!
//! | Flag                                  | Short | Value                      |
//! |---------------------------------------|-------|----------------------------|
//! | `--config-option`                     | `-C`  | `section.*.key=string`     |
//! | `--boolean-config-option`             | `-B`  | `section.*.key=true\|false\|1\|0` |
//! | `--integer-config-option`             | `-I`  | `section.*.key=42`         |
//! | `--float-config-option`               | `-F`  | `section.*.key=0.5`        |
//! | `--json-config-option`                | `-J`  | `section.*.key=<any JSON>` |
//! | `--config-file`                       | `-c`  | path to a JSON file        |
//! | `--log-level`                         |       | `debug` .. `critical`      |
//! | `--log-file`                          |       | path                       |
//! | `--log-message-format`                |       | `full\|compact\|pretty`    |
//!
//! Short names are off by default because single letters collide easily
//! with an application's own flags. Turn them on with
//! [`ConfigFlags::short_names`].
//!
//! # Overrides
//!
//! Every override flag takes `path=value`. The path is split on `.` and the
//! value is cast according to the flag, then written into one shared map.
//! Missing intermediate levels are created. Overrides apply in command-line
//! order, across all five flags, so the last one to name a path wins:
//!
//! ```text
//! -I server.port=80 -C server.port=http   →   {"server": {"port": "http"}}
//! ```
//!
//! Walking through an existing non-object value (`-I a=1 -I a.b=2`) is a
//! [`PathConflict`](ClapscriptError::PathConflict) rather than a silent
//! overwrite.
//!
//! # Config files
//!
//! A config file is a JSON object. Its contributed section is the value of
//! the first *recognized key* it contains, `"config"` by default; all other
//! top-level keys are ignored. Applications with their own naming pass a
//! list, tried in order:
//!
//! ```ignore
//! let flags = ConfigFlags::new().recognized_keys(["run_config", "config"]);
//! ```
//!
//! The first `--config-file` establishes the file map and each later one is
//! deep-merged on top: objects merge key by key, anything else is replaced.
//! The last file wins.
//!
//! # Two destinations
//!
//! [`ParsedConfig`] keeps override values (`options`) and file values
//! (`files`) apart. [`ParsedConfig::layered`] merges overrides on top of
//! files, which is what most scripts want:
//!
//! ```text
//! Config files          --config-file, later files win
//!        ↑ overridden by
//! Overrides             --*-config-option, later flags win
//! ```
//!
//! # Logging
//!
//! [`init_logging`] installs a `tracing-subscriber` formatter from
//! [`LogArgs`]. It is never called for you: building or parsing the command
//! has no global side effects. `RUST_LOG` takes precedence over
//! `--log-level`.
//!
//! # Core library without clap
//!
//! The cast, override, merge and file modules have no clap dependency. Build
//! with `default-features = false` and drive them directly:
//!
//! ```ignore
//! let mut config = ConfigMap::new();
//! apply_override(&mut config, parse_typed_override("db.pool=20", ValueKind::Integer)?)?;
//! ConfigFileLoader::default().load_into(&mut config, Path::new("run.json"))?;
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`ClapscriptError`]. Through the clap
//! adapter every error surfaces as a usage error naming the flag and its raw
//! value, before anything was written for that flag. Enable the
//! `rich-errors` feature for `miette` diagnostics.

pub mod error;
pub mod types;

mod cast;
#[cfg(feature = "clap")]
mod cli;
mod file;
mod logging;
pub(crate) mod merge;
mod overrides;
mod parsed;
mod resolve;

#[cfg(test)]
mod fixtures;

pub use cast::cast_value;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigFileParser, ConfigFlags, OverrideParser, ScriptArgs};
pub use error::ClapscriptError;
pub use file::{
    ConfigFileLoader, ConfigSection, DEFAULT_CONFIG_KEYS, accumulate, extract_section,
    load_document,
};
pub use logging::{LogArgs, LogFormat, LogLevel, init_logging};
pub use merge::deep_merge;
pub use overrides::{
    apply_override, overrides_to_map, parse_key_value, parse_override, parse_typed_override,
    set_nested,
};
pub use parsed::{ParsedConfig, flatten, map_get};
pub use resolve::{ResolveInput, resolve};
pub use types::{ConfigMap, OverrideEntry, OverrideOrigin, ValueKind};
