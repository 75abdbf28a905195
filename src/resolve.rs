//! Core resolution pipeline: fold parsed flag values into a [`ParsedConfig`].
//!
//! Operates on already-parsed data (`ResolveInput`) with no I/O. Casting and
//! file loading happen earlier, when each flag value is parsed, so the only
//! failure left here is a [`PathConflict`](ClapscriptError::PathConflict),
//! wrapped in [`FlagValue`](ClapscriptError::FlagValue) when the entry
//! records the flag it came from.
//! Steps:
//!
//! 1. Accumulate config file sections in command-line order (first file
//!    establishes the map, later files deep-merge on top)
//! 2. Apply override entries in command-line order to a separate map

use crate::error::ClapscriptError;
use crate::file::{ConfigSection, accumulate};
use crate::overrides::apply_override;
use crate::parsed::ParsedConfig;
use crate::types::{ConfigMap, OverrideEntry};

/// Everything the flags produced, in command-line order.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// Override entries from all typed override flags, interleaved as given.
    pub overrides: Vec<OverrideEntry>,
    /// Config file sections, first = lowest priority.
    pub sections: Vec<ConfigSection>,
}

/// Resolve flag values into the two destination maps.
pub fn resolve(input: ResolveInput) -> Result<ParsedConfig, ClapscriptError> {
    let mut files = ConfigMap::new();
    for section in input.sections {
        accumulate(&mut files, section.values);
    }

    let mut options = ConfigMap::new();
    for entry in input.overrides {
        apply_override(&mut options, entry)?;
    }

    Ok(ParsedConfig { options, files })
}
