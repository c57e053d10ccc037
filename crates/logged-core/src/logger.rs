//! The logger facade.
//!
//! A [`Logger`] decides whether an entry is written and with which metadata,
//! then hands it to its [`Serializer`]. Loggers are cheap to clone and derive:
//! children made with [`Logger::with_defaults`] or [`Logger::scoped`] share the
//! parent's serializer (and therefore its lock) and never mutate the parent.
//!
//! ## Debug scopes
//!
//! Debug entries are only written when the logger's debug scopes allow the
//! call site:
//!
//! - no scopes: never
//! - `*`: always
//! - otherwise: when the call-site identity starts with one of the prefixes
//!
//! The identity is either bound to the logger ([`Logger::scoped`]) or passed
//! with the call ([`Logger::debug_in`]). The [`debug!`](crate::debug) macro
//! passes the caller's `module_path!()`.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::entry::{Data, Entry, Level};
use crate::error::LogResult;
use crate::serializer::Serializer;

/// Scope entry that enables debug output everywhere.
pub const WILDCARD: &str = "*";

/// Allow-list of call-site prefixes for debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugScopes {
    prefixes: Arc<[String]>,
}

impl Default for DebugScopes {
    fn default() -> Self {
        Self::none()
    }
}

impl DebugScopes {
    /// Debug output disabled.
    pub fn none() -> Self {
        Self {
            prefixes: Arc::from(Vec::new()),
        }
    }

    /// Debug output enabled for every call site.
    pub fn all() -> Self {
        Self::from_prefixes([WILDCARD])
    }

    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        self.prefixes.iter().any(|p| p == WILDCARD)
    }

    /// Whether a call site with `identity` may write debug entries.
    pub fn allows(&self, identity: Option<&str>) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_wildcard() {
            return true;
        }
        match identity {
            Some(id) => self.prefixes.iter().any(|p| id.starts_with(p.as_str())),
            None => false,
        }
    }
}

/// Merge per-call metadata over `defaults`.
///
/// Later maps win over earlier ones and every per-call map wins over the
/// defaults. Nothing is copied when only one side has entries.
pub fn merge<'a>(defaults: &'a Data, data: &[&'a Data]) -> Cow<'a, Data> {
    let mut supplied = data.iter().copied().filter(|d| !d.is_empty());

    let first = match supplied.next() {
        None => return Cow::Borrowed(defaults),
        Some(first) => first,
    };

    let rest: Vec<&Data> = supplied.collect();
    if defaults.is_empty() && rest.is_empty() {
        return Cow::Borrowed(first);
    }

    let mut merged = defaults.clone();
    for d in std::iter::once(first).chain(rest) {
        merged.extend(d.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Cow::Owned(merged)
}

/// Leveled, structured logger.
#[derive(Clone)]
pub struct Logger {
    serializer: Arc<dyn Serializer>,
    defaults: Arc<Data>,
    debug_scopes: DebugScopes,
    scope: Option<Arc<str>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("defaults", &self.defaults)
            .field("debug_scopes", &self.debug_scopes)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Logger without defaults and with debug output disabled.
    pub fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self {
            serializer,
            defaults: Arc::new(Data::new()),
            debug_scopes: DebugScopes::none(),
            scope: None,
        }
    }

    /// Logger with the defaults and debug scopes from `config`.
    pub fn with_config(serializer: Arc<dyn Serializer>, config: &Config) -> Self {
        Self {
            serializer,
            defaults: Arc::new(config.defaults.clone()),
            debug_scopes: DebugScopes::from_prefixes(config.debug_scopes.iter().cloned()),
            scope: None,
        }
    }

    /// Replace the debug scopes.
    pub fn with_debug_scopes(mut self, scopes: DebugScopes) -> Self {
        self.debug_scopes = scopes;
        self
    }

    pub fn defaults(&self) -> &Data {
        &self.defaults
    }

    pub fn debug_scopes(&self) -> &DebugScopes {
        &self.debug_scopes
    }

    /// Call-site identity bound to this logger, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Child logger whose defaults are these defaults with `extra` on top.
    pub fn with_defaults(&self, extra: &Data) -> Logger {
        let defaults = if extra.is_empty() {
            Arc::clone(&self.defaults)
        } else {
            Arc::new(merge(&self.defaults, &[extra]).into_owned())
        };

        Logger {
            serializer: Arc::clone(&self.serializer),
            defaults,
            debug_scopes: self.debug_scopes.clone(),
            scope: self.scope.clone(),
        }
    }

    /// Child logger bound to the call-site identity `scope` (e.g. `"my_app::http"`).
    pub fn scoped(&self, scope: impl Into<String>) -> Logger {
        let scope: String = scope.into();
        let mut child = self.clone();
        child.scope = Some(Arc::from(scope));
        child
    }

    /// Whether debug entries from this logger's bound scope are written.
    pub fn is_debug(&self) -> bool {
        self.debug_scopes.allows(self.scope())
    }

    /// Whether debug entries from call site `scope` are written.
    pub fn is_debug_for(&self, scope: &str) -> bool {
        self.debug_scopes.allows(Some(scope))
    }

    pub fn info(&self, message: &str, data: Option<&Data>) -> LogResult<()> {
        self.write(Level::Info, Cow::Borrowed(message), data.as_slice())
    }

    /// Info entry with several metadata maps, applied left to right.
    pub fn info_all(&self, message: &str, data: &[&Data]) -> LogResult<()> {
        self.write(Level::Info, Cow::Borrowed(message), data)
    }

    /// Debug entry, written only if [`is_debug`](Self::is_debug).
    ///
    /// Unless the wildcard is configured, an unscoped logger writes nothing
    /// here; bind an identity with [`scoped`](Self::scoped) or use
    /// [`debug!`](crate::debug).
    pub fn debug(&self, message: &str, data: Option<&Data>) -> LogResult<()> {
        if !self.is_debug() {
            return Ok(());
        }
        self.write(Level::Debug, Cow::Borrowed(message), data.as_slice())
    }

    /// Debug entry for call site `scope`, written only if [`is_debug_for`](Self::is_debug_for).
    pub fn debug_in(&self, scope: &str, message: &str, data: Option<&Data>) -> LogResult<()> {
        if !self.is_debug_for(scope) {
            return Ok(());
        }
        self.write(Level::Debug, Cow::Borrowed(message), data.as_slice())
    }

    /// Error entry carrying `err`'s message. `None` writes nothing.
    pub fn error<E>(&self, err: Option<&E>, data: Option<&Data>) -> LogResult<()>
    where
        E: fmt::Display + ?Sized,
    {
        match err {
            Some(err) => self.write(Level::Error, Cow::Owned(err.to_string()), data.as_slice()),
            None => Ok(()),
        }
    }

    /// Info entry carrying `err`'s message. `None` writes nothing.
    pub fn info_error<E>(&self, err: Option<&E>, data: Option<&Data>) -> LogResult<()>
    where
        E: fmt::Display + ?Sized,
    {
        match err {
            Some(err) => self.write(Level::Info, Cow::Owned(err.to_string()), data.as_slice()),
            None => Ok(()),
        }
    }

    /// Debug entry carrying `err`'s message, subject to [`is_debug`](Self::is_debug).
    pub fn debug_error<E>(&self, err: Option<&E>, data: Option<&Data>) -> LogResult<()>
    where
        E: fmt::Display + ?Sized,
    {
        match err {
            Some(err) if self.is_debug() => {
                self.write(Level::Debug, Cow::Owned(err.to_string()), data.as_slice())
            }
            _ => Ok(()),
        }
    }

    /// Write an entry at `level` without any gating.
    pub fn log(&self, level: Level, message: &str, data: &[&Data]) -> LogResult<()> {
        self.write(level, Cow::Borrowed(message), data)
    }

    fn write(&self, level: Level, message: Cow<'_, str>, data: &[&Data]) -> LogResult<()> {
        let entry = Entry::new(level, message, merge(&self.defaults, data));
        self.serializer.write(&entry)
    }
}

/// Write a debug entry using the caller's module path as call-site identity.
///
/// ```ignore
/// logged_core::debug!(log, "cache miss");
/// logged_core::debug!(log, "cache miss", &data);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $message:expr) => {
        $logger.debug_in(::core::module_path!(), $message, ::core::option::Option::None)
    };
    ($logger:expr, $message:expr, $data:expr) => {
        $logger.debug_in(::core::module_path!(), $message, ::core::option::Option::Some($data))
    };
}

/// Whether debug entries from the caller's module are written.
#[macro_export]
macro_rules! is_debug {
    ($logger:expr) => {
        $logger.is_debug_for(::core::module_path!())
    };
}
