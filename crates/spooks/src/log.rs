//! CallLog - shared record of spy invocations
//!
//! A [`CallLog`] is created by the test and handed to every factory. Spies
//! only ever append to it; the test reads it back to make assertions.
//!
//! Per name the log keeps three series that grow in lockstep:
//! - `counts[name]`: number of calls
//! - `args[name]`: argument list of each call
//! - `these[name]`: receiver of each call (when receiver tracking is on)

use crate::config::LogConfig;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Recorded calls for one name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Number of calls
    pub count: usize,

    /// Arguments of each call, in call order
    pub args: Vec<Vec<Value>>,

    /// Receiver of each call, aligned with `args`
    ///
    /// Handles here are strong and live until [`CallLog::clear_calls`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub these: Option<Vec<Value>>,
}

impl LogEntry {
    fn empty(track_receivers: bool) -> Self {
        Self {
            count: 0,
            args: Vec::new(),
            these: track_receivers.then(Vec::new),
        }
    }

    fn clear(&mut self) {
        self.count = 0;
        self.args.clear();
        if let Some(these) = &mut self.these {
            these.clear();
        }
    }
}

#[derive(Debug, Default)]
struct LogState {
    config: LogConfig,
    entries: IndexMap<String, LogEntry>,
}

/// Shared call log
///
/// Cloning a `CallLog` yields another handle to the same record, which is how
/// one log is shared by many spies.
///
/// # Example
/// ```
/// use spooks::{args, function, CallLog, FunctionOptions};
///
/// let log = CallLog::new();
/// let spy = function(FunctionOptions::new("foo").with_log(&log)).unwrap();
///
/// spy.call(args!["a", "b"]);
/// spy.call(args!["c"]);
///
/// assert_eq!(log.count("foo"), Some(2));
/// assert_eq!(log.args("foo").unwrap(), vec![args!["a", "b"], args!["c"]]);
/// assert_eq!(log.count("bar"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<LogState>>,
}

impl CallLog {
    /// Create empty log with receiver tracking
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty log with explicit configuration
    #[must_use]
    pub fn with_config(config: LogConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogState {
                config,
                entries: IndexMap::new(),
            })),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> LogConfig {
        self.inner.lock().config
    }

    /// Insert an empty entry for `name` unless one exists
    ///
    /// Returns true if the entry was created by this call. An existing entry,
    /// including its recorded calls, is left untouched.
    pub fn ensure_entry(&self, name: &str) -> bool {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        if state.entries.contains_key(name) {
            return false;
        }
        state
            .entries
            .insert(name.to_string(), LogEntry::empty(state.config.track_receivers));
        true
    }

    /// Record one call and return the updated count
    pub(crate) fn record(&self, name: &str, receiver: &Value, args: Vec<Value>) -> usize {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        let track = state.config.track_receivers;
        let entry = state
            .entries
            .entry(name.to_string())
            .or_insert_with(|| LogEntry::empty(track));

        entry.count += 1;
        entry.args.push(args);
        if let Some(these) = &mut entry.these {
            these.push(receiver.clone());
        }
        entry.count
    }

    /// Call count for `name`, `None` if the name was never referenced
    #[must_use]
    pub fn count(&self, name: &str) -> Option<usize> {
        self.inner.lock().entries.get(name).map(|e| e.count)
    }

    /// Argument lists recorded for `name`
    #[must_use]
    pub fn args(&self, name: &str) -> Option<Vec<Vec<Value>>> {
        self.inner.lock().entries.get(name).map(|e| e.args.clone())
    }

    /// Receivers recorded for `name`
    ///
    /// `None` for unknown names and when receiver tracking is off.
    #[must_use]
    pub fn these(&self, name: &str) -> Option<Vec<Value>> {
        self.inner
            .lock()
            .entries
            .get(name)
            .and_then(|e| e.these.clone())
    }

    /// Full entry for `name`
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<LogEntry> {
        self.inner.lock().entries.get(name).cloned()
    }

    /// Check if `name` has an entry
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().entries.contains_key(name)
    }

    /// Names in order of first reference
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner.lock().entries.keys().cloned().collect()
    }

    /// Zero every entry, keeping the names
    pub fn clear_calls(&self) {
        let mut guard = self.inner.lock();
        for entry in guard.entries.values_mut() {
            entry.clear();
        }
        tracing::debug!("Cleared calls for {} names", guard.entries.len());
    }

    /// Copy of the whole log
    #[must_use]
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            entries: self.inner.lock().entries.clone(),
        }
    }

    /// Check if both handles point at the same log
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &CallLog) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Point-in-time copy of a [`CallLog`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogSnapshot {
    entries: IndexMap<String, LogEntry>,
}

impl LogSnapshot {
    /// Entry for `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LogEntry> {
        self.entries.get(name)
    }

    /// Iterate entries in order of first reference
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LogEntry)> {
        self.entries.iter()
    }

    /// Number of names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no name was referenced
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as JSON
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
