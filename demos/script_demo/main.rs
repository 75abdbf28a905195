//! # clapscript demo script
//!
//! A sample script that wires clapscript's flags into a clap command and
//! prints what it resolved. It exists to demonstrate and manually verify the
//! flags; it does no real work.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example script_demo -- show
//! cargo run --example script_demo -- -I server.port=8080 -C server.host=0.0.0.0 show
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                 | How to exercise it                                                    |
//! |-------------------------|-----------------------------------------------------------------------|
//! | String override         | `-- -C display.color=red show`                                        |
//! | Typed overrides         | `-- -B verbose=true -I server.port=9 -F rate=0.5 show`                |
//! | JSON override           | `-- -J 'server.tags=["a","b"]' show`                                  |
//! | Config file             | `-- -c run.json show` with `{"run_config": {"server": {"port": 1}}}`  |
//! | Several files           | `-- -c base.json -c local.json show` (later file wins)                |
//! | Overrides beat files    | `-- -c run.json -I server.port=2 show`                                |
//! | Single key              | `-- -I server.port=9 show --key server.port`                          |
//! | JSON output             | `-- -I server.port=9 show --json`                                     |
//! | Logging                 | `-- --log-level debug show`                                           |
//! | Log to file             | `-- --log-level info --log-file demo.log show`                        |
//! | Bad input               | `-- -I server.port=nine show` (usage error, exit 2)                   |

use std::process::ExitCode;

use clap::{ArgMatches, Args, Command, FromArgMatches, Subcommand};

use clapscript::{ConfigFlags, LogArgs, ParsedConfig};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved configuration.
    Show {
        /// Print only this dotted key.
        #[arg(long)]
        key: Option<String>,

        /// Print both destinations as JSON instead of a listing.
        #[arg(long)]
        json: bool,
    },
}

/// The demo recognizes its own section name first, then the default one.
fn config_flags() -> ConfigFlags {
    ConfigFlags::new()
        .recognized_keys(["run_config", "config"])
        .short_names(true)
}

fn command(flags: &ConfigFlags) -> Command {
    let cmd = Command::new("script-demo")
        .about("clapscript demo: typed config overrides, JSON config files, logging")
        .subcommand_required(true);
    let cmd = LogArgs::augment_args(cmd);
    let cmd = flags.augment(cmd);
    Commands::augment_subcommands(cmd)
}

fn show(config: &ParsedConfig, key: Option<&str>, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }
    match key {
        Some(key) => {
            let value = config
                .get(key)
                .ok_or_else(|| format!("Unknown key: {key}"))?;
            println!("{key} = {value}");
        }
        None => println!("{config}"),
    }
    Ok(())
}

fn run(flags: &ConfigFlags, matches: &ArgMatches) -> Result<(), String> {
    let log = LogArgs::from_arg_matches(matches).map_err(|e| e.to_string())?;
    clapscript::init_logging(&log).map_err(|e| e.to_string())?;

    let config = flags.extract(matches).map_err(|e| e.to_string())?;
    config.log_entries();

    match Commands::from_arg_matches(matches).map_err(|e| e.to_string())? {
        Commands::Show { key, json } => show(&config, key.as_deref(), json),
    }
}

fn main() -> ExitCode {
    let flags = config_flags();
    let mut cmd = command(&flags);
    let matches = cmd.get_matches_mut();

    match run(&flags, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            cmd.error(clap::error::ErrorKind::ValueValidation, message)
                .print()
                .ok();
            ExitCode::from(2)
        }
    }
}
