use crate::constants::CHANGED_KEY_SEPARATOR;

use super::WatcherId;

/// How a Watch call stopped waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEnd {
    /// The watch window elapsed
    TimedOut,
    /// The caller's cancellation token fired first
    Cancelled,
}

impl WatchEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchEnd::TimedOut => "timed_out",
            WatchEnd::Cancelled => "cancelled",
        }
    }
}

/// Result of one Watch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    pub watcher_id: WatcherId,
    /// Changed keys in delivery order, duplicates kept
    pub changed_keys: Vec<String>,
    pub end: WatchEnd,
}

impl WatchOutcome {
    /// Wire form of the changed keys, see [`encode_changed_keys`]
    pub fn encode(&self) -> String {
        encode_changed_keys(&self.changed_keys)
    }
}

/// Concatenates keys, each followed by the separator: `["a", "b"]` -> `"a,b,"`.
pub fn encode_changed_keys<S: AsRef<str>>(keys: &[S]) -> String {
    let mut encoded = String::with_capacity(keys.iter().map(|k| k.as_ref().len() + 1).sum());
    for key in keys {
        encoded.push_str(key.as_ref());
        encoded.push(CHANGED_KEY_SEPARATOR);
    }
    encoded
}

/// Inverse of [`encode_changed_keys`] for keys free of the separator.
pub fn decode_changed_keys(encoded: &str) -> Vec<String> {
    encoded
        .strip_suffix(CHANGED_KEY_SEPARATOR)
        .map(|body| body.split(CHANGED_KEY_SEPARATOR).map(str::to_string).collect())
        .unwrap_or_default()
}
