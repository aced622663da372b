// -
// Watch

/// Terminates every key in an encoded watch result
pub(crate) const CHANGED_KEY_SEPARATOR: char = ',';

/// Upper bound on waiting for the store lock.
///
/// Holders never block or await, so a wait this long means the lock was
/// acquired recursively or fan-out deadlocked with registration.
pub(crate) const STATE_LOCK_DEADLOCK_TIMEOUT_MS: u64 = 5_000;

// -
// Client

pub(crate) const DEFAULT_CLIENT_CONNECT_TIMEOUT_MS: u64 = 3_000;
