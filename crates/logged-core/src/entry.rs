//! Log entry types.
//!
//! An [`Entry`] is built once per log call, handed to a
//! [`Serializer`](crate::serializer::Serializer) by reference and then dropped.
//! It borrows the message and the merged metadata, so emitting a line never
//! copies either of them.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Key/value metadata attached to an entry.
///
/// A `BTreeMap` keeps the `data` object in a stable key order on the wire.
pub type Data = BTreeMap<String, String>;

/// Severity tag of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl Level {
    /// Text written to the `level` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "error" => Ok(Level::Error),
            other => Err(LogError::Config(format!("unknown level: {}", other))),
        }
    }
}

/// A single line in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<'a> {
    /// RFC 3339 UTC timestamp with nanoseconds (e.g. "2024-01-01T00:00:00.000000000Z")
    pub timestamp: String,

    /// Severity tag
    pub level: Level,

    /// Human-readable message, not pre-escaped
    pub message: Cow<'a, str>,

    /// Merged metadata; omitted from the line when empty
    #[serde(default, skip_serializing_if = "data_is_empty")]
    pub data: Cow<'a, Data>,
}

fn data_is_empty(data: &Cow<'_, Data>) -> bool {
    data.is_empty()
}

/// Current UTC time in the wire format.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl<'a> Entry<'a> {
    /// Create a new entry stamped with the current time.
    pub fn new(
        level: Level,
        message: impl Into<Cow<'a, str>>,
        data: Cow<'a, Data>,
    ) -> Self {
        Self {
            timestamp: timestamp_now(),
            level,
            message: message.into(),
            data,
        }
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Detach the entry from the borrowed message and metadata.
    pub fn into_owned(self) -> Entry<'static> {
        Entry {
            timestamp: self.timestamp,
            level: self.level,
            message: Cow::Owned(self.message.into_owned()),
            data: Cow::Owned(self.data.into_owned()),
        }
    }

    /// Parse one emitted JSON line.
    pub fn from_json_line(line: &str) -> Result<Entry<'static>, serde_json::Error> {
        serde_json::from_str(line)
    }
}
