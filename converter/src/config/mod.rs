//! Configuration.
//!
//! - [`HeaderMap`]: source column names to canonical fields
//! - [`DialectConfig`]: input/output CSV dialects
//! - [`Settings`]: environment defaults (`.env` is loaded by the CLI)

pub mod dialect;
pub mod header_map;

use std::env;
use std::path::PathBuf;

pub use dialect::DialectConfig;
pub use header_map::{HeaderMap, HeaderOverrides};

use crate::error::ConfigResult;
use crate::logs::Verbosity;

/// Environment variable naming a header map override file.
pub const HEADER_MAP_ENV: &str = "ARGENTA_HEADER_MAP";
/// Environment variable selecting log verbosity.
pub const LOG_ENV: &str = "ARGENTA_LOG";

/// Settings taken from the environment, overridden by CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub header_map: Option<PathBuf>,
    pub verbosity: Option<Verbosity>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            header_map: lookup(HEADER_MAP_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            verbosity: lookup(LOG_ENV).and_then(|v| Verbosity::from_name(&v)),
        }
    }

    /// Header map with the configured overrides applied.
    pub fn build_header_map(&self) -> ConfigResult<HeaderMap> {
        match &self.header_map {
            Some(path) => HeaderMap::with_overrides(HeaderOverrides::load(path)?.0),
            None => Ok(HeaderMap::default()),
        }
    }
}
