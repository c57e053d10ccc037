//! Serializers that turn an [`Entry`] into one line on a sink.
//!
//! Each serializer owns its sink behind a single lock. The whole
//! encode-and-flush sequence runs under that lock, so lines written by
//! concurrent callers never interleave.
//!
//! A line is encoded into a scratch buffer first and only then handed to the
//! sink. A failed write therefore leaves nothing behind to leak into the next
//! one, and a line the sink cut short is terminated before the next line
//! starts.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;

use crate::entry::Entry;
use crate::error::{LogError, LogResult};
use crate::escape::write_json_str;

/// Writes entries to an output.
pub trait Serializer: Send + Sync {
    /// Append one line for `entry` and flush it.
    fn write(&self, entry: &Entry<'_>) -> LogResult<()>;
}

impl<S: Serializer + ?Sized> Serializer for Arc<S> {
    fn write(&self, entry: &Entry<'_>) -> LogResult<()> {
        (**self).write(entry)
    }
}

impl<S: Serializer + ?Sized> Serializer for Box<S> {
    fn write(&self, entry: &Entry<'_>) -> LogResult<()> {
        (**self).write(entry)
    }
}

/// Line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One JSON object per line (default)
    #[default]
    Json,
    /// `timestamp [level] message key=value ...`
    Text,
}

impl Format {
    /// Build a serializer of this format over `sink`.
    pub fn serializer<W>(self, sink: W) -> Arc<dyn Serializer>
    where
        W: Write + Send + 'static,
    {
        match self {
            Format::Json => Arc::new(JsonSerializer::new(sink)),
            Format::Text => Arc::new(TextSerializer::new(sink)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Text => f.write_str("text"),
        }
    }
}

impl FromStr for Format {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "text" => Ok(Format::Text),
            other => Err(LogError::Config(format!("unknown format: {}", other))),
        }
    }
}

/// Sink plus the scratch buffer lines are encoded into.
struct LineSink<W> {
    sink: W,
    line: Vec<u8>,
    /// The last line only partly reached the sink.
    torn: bool,
}

impl<W: Write> LineSink<W> {
    fn new(sink: W) -> Self {
        Self {
            sink,
            line: Vec::with_capacity(256),
            torn: false,
        }
    }

    /// Encode one line with `encode` and push it to the sink.
    fn emit<F>(&mut self, encode: F) -> io::Result<()>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        // Terminator owed to a line the sink cut short.
        let lead = usize::from(self.torn);
        self.line.clear();
        self.line.resize(lead, b'\n');
        encode(&mut self.line)?;

        let mut written = 0;
        while written < self.line.len() {
            match self.sink.write(&self.line[written..]) {
                Ok(0) => {
                    self.mark_short(written, lead);
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole log line",
                    ));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.mark_short(written, lead);
                    return Err(e);
                }
            }
        }

        self.torn = false;
        self.sink.flush()
    }

    /// Record a write that stopped after `written` bytes, `lead` of which
    /// were the owed terminator. Nothing written keeps the debt as it was.
    fn mark_short(&mut self, written: usize, lead: usize) {
        if written > 0 {
            self.torn = written > lead;
        }
    }
}

/// Hand-rolled JSON line serializer.
///
/// Fields are always emitted in the order `timestamp`, `level`, `message`,
/// `data`; `data` is left out when the entry carries no metadata.
pub struct JsonSerializer<W: Write> {
    inner: Mutex<LineSink<W>>,
}

impl<W: Write> JsonSerializer<W> {
    /// Create a serializer writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            inner: Mutex::new(LineSink::new(sink)),
        }
    }

    fn encode(w: &mut Vec<u8>, entry: &Entry<'_>) -> io::Result<()> {
        w.write_all(b"{\"timestamp\":")?;
        write_json_str(w, entry.timestamp.as_bytes())?;
        w.write_all(b",\"level\":")?;
        write_json_str(w, entry.level.as_str().as_bytes())?;
        w.write_all(b",\"message\":")?;
        write_json_str(w, entry.message.as_bytes())?;

        if !entry.data.is_empty() {
            w.write_all(b",\"data\":{")?;
            for (i, (key, value)) in entry.data.iter().enumerate() {
                if i > 0 {
                    w.write_all(b",")?;
                }
                write_json_str(w, key.as_bytes())?;
                w.write_all(b":")?;
                write_json_str(w, value.as_bytes())?;
            }
            w.write_all(b"}")?;
        }

        w.write_all(b"}\n")
    }
}

impl JsonSerializer<io::Stdout> {
    /// Serializer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Serializer for JsonSerializer<W> {
    fn write(&self, entry: &Entry<'_>) -> LogResult<()> {
        self.inner.lock().emit(|line| Self::encode(line, entry))?;
        Ok(())
    }
}

/// Plain-text line serializer. Performs no escaping.
pub struct TextSerializer<W: Write> {
    inner: Mutex<LineSink<W>>,
}

impl<W: Write> TextSerializer<W> {
    /// Create a serializer writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            inner: Mutex::new(LineSink::new(sink)),
        }
    }

    fn encode(w: &mut Vec<u8>, entry: &Entry<'_>) -> io::Result<()> {
        write!(w, "{} [{}] {}", entry.timestamp, entry.level, entry.message)?;
        for (key, value) in entry.data.iter() {
            write!(w, " {}={}", key, value)?;
        }
        w.write_all(b"\n")
    }
}

impl<W: Write + Send> Serializer for TextSerializer<W> {
    fn write(&self, entry: &Entry<'_>) -> LogResult<()> {
        self.inner.lock().emit(|line| Self::encode(line, entry))?;
        Ok(())
    }
}
