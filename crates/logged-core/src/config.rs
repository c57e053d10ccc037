//! Logger configuration.

use std::env;
use std::io::Write;

use serde::Deserialize;

use crate::entry::Data;
use crate::error::{LogError, LogResult};
use crate::logger::Logger;
use crate::serializer::Format;

/// Options a [`Logger`] is built from.
///
/// `debug_scopes` follows the usual convention: empty disables debug output,
/// `["*"]` enables it everywhere and anything else is a list of call-site
/// prefixes (e.g. `"my_app::http"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line format
    pub format: Format,
    /// Metadata merged into every entry
    pub defaults: Data,
    /// Call-site prefixes allowed to write debug entries
    pub debug_scopes: Vec<String>,
}

impl Config {
    /// Create config from environment variables
    ///
    /// Reads:
    /// - `LOGGED_FORMAT`: json or text
    /// - `LOGGED_DEBUG`: comma-separated debug scopes (`*` for all)
    /// - `LOGGED_DEFAULTS`: comma-separated `key=value` pairs
    pub fn from_env() -> LogResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LogResult<Self> {
        let mut config = Self::default();

        if let Some(format) = lookup("LOGGED_FORMAT") {
            config.format = format.trim().parse()?;
        }

        if let Some(scopes) = lookup("LOGGED_DEBUG") {
            config.debug_scopes = split_list(&scopes).map(str::to_string).collect();
        }

        if let Some(defaults) = lookup("LOGGED_DEFAULTS") {
            for pair in split_list(&defaults) {
                let (key, value) = parse_pair(pair)?;
                config.defaults.insert(key, value);
            }
        }

        Ok(config)
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(source: &str) -> LogResult<Self> {
        serde_json::from_str(source).map_err(|e| LogError::Config(e.to_string()))
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Add one default metadata pair.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Allow debug entries from call sites starting with `scope`.
    pub fn with_debug_scope(mut self, scope: impl Into<String>) -> Self {
        self.debug_scopes.push(scope.into());
        self
    }

    /// Build a logger writing to `sink` in the configured format.
    pub fn build<W>(&self, sink: W) -> Logger
    where
        W: Write + Send + 'static,
    {
        Logger::with_config(self.format.serializer(sink), self)
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse `key=value`. The value may itself contain `=`.
pub fn parse_pair(pair: &str) -> LogResult<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(LogError::Config(format!(
            "expected key=value, got {:?}",
            pair
        ))),
    }
}
