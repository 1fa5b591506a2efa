//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (SWEEP_* prefix)

use crate::foundation::Result;
use crate::infrastructure::config::types::SweepConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::Path;

/// Environment variable prefix for config overrides.
///
/// Example: `SWEEP_MAX_CANDIDATES` -> `max_candidates`
const ENV_PREFIX: &str = "SWEEP_";

pub fn load_config(path: Option<&Path>) -> Result<SweepConfig> {
    let mut figment = Figment::from(Serialized::defaults(SweepConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    let config: SweepConfig = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
    config.validate()?;
    Ok(config)
}
