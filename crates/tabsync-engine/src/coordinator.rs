//! Per-key mutual exclusion for reconciliation passes.
//!
//! Advisory, in-memory, single-process locking: a process-wide map from
//! source key to lock holder, mutated only through acquire/release. The
//! state machine per key is Idle → Locked → Idle, nothing else. This does
//! not coordinate across independent processes; multi-instance deployments
//! need a distributed lock instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tabsync_core::errors::{Result, TsError, TsErrorKind};
use tabsync_core_types::SourceKey;
use uuid::Uuid;

/// Default bounded wait for a contended lock.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

/// Poll interval while waiting for a contended lock to clear.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct LockHolder {
    token: String,
    acquired_at: Instant,
}

type LockMap = Arc<Mutex<HashMap<String, LockHolder>>>;

/// Coordinator ensuring at most one reconciliation pass per source key.
///
/// Cheap to clone; clones share the same lock map.
#[derive(Debug, Clone, Default)]
pub struct SyncCoordinator {
    locks: LockMap,
}

/// RAII release handle for one acquired key.
///
/// Dropping the guard releases the lock, so release happens on every exit
/// path including panics. The guard only removes its own entry: if a
/// timed-out waiter defensively cleared the slot and another pass took it,
/// this drop leaves the newer holder untouched.
#[derive(Debug)]
pub struct SyncGuard {
    key: String,
    token: String,
    locks: LockMap,
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        let mut map = lock_map(&self.locks);
        let owned = map
            .get(&self.key)
            .map(|holder| holder.token == self.token)
            .unwrap_or(false);
        if owned {
            map.remove(&self.key);
        }
    }
}

/// Lock the map, recovering from poisoning.
///
/// A panic while holding the map mutex cannot leave the map in a torn state
/// (all mutations are single inserts/removes), so the poisoned value is safe
/// to take.
fn lock_map(locks: &LockMap) -> std::sync::MutexGuard<'_, HashMap<String, LockHolder>> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SyncCoordinator {
    /// Create a coordinator with an empty lock map
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a key, failing fast on contention.
    ///
    /// # Errors
    ///
    /// - `LockContention` — a pass for this key is already in flight
    pub fn acquire(&self, key: &SourceKey) -> Result<SyncGuard> {
        let mut map = lock_map(&self.locks);

        if map.contains_key(key.as_str()) {
            return Err(TsError::new(TsErrorKind::LockContention)
                .with_op("acquire")
                .with_source_key(key.as_str())
                .with_message("A reconciliation pass for this key is already running"));
        }

        let token = Uuid::now_v7().to_string();
        map.insert(
            key.as_str().to_string(),
            LockHolder {
                token: token.clone(),
                acquired_at: Instant::now(),
            },
        );

        tracing::debug!(source_key = %key, "Acquired sync lock");

        Ok(SyncGuard {
            key: key.as_str().to_string(),
            token,
            locks: Arc::clone(&self.locks),
        })
    }

    /// Acquire with a bounded wait for the in-flight pass to finish.
    ///
    /// Polls until `timeout` elapses. On expiry the stale-looking entry is
    /// cleared defensively rather than left to block future attempts
    /// indefinitely, and one final acquire is attempted; if another pass
    /// takes the slot first, `LockContention` is surfaced as retryable.
    pub fn acquire_with_wait(&self, key: &SourceKey, timeout: Duration) -> Result<SyncGuard> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.acquire(key) {
                Ok(guard) => return Ok(guard),
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(WAIT_POLL_INTERVAL);
                }
                Err(_) => break,
            }
        }

        // Wait expired: treat the holder as potentially stale and clear it.
        {
            let mut map = lock_map(&self.locks);
            if let Some(holder) = map.remove(key.as_str()) {
                tracing::warn!(
                    source_key = %key,
                    held_for_ms = holder.acquired_at.elapsed().as_millis() as u64,
                    "Lock wait expired, clearing potentially stale holder"
                );
            }
        }

        self.acquire(key).map_err(|_| {
            TsError::new(TsErrorKind::LockContention)
                .with_op("acquire_with_wait")
                .with_source_key(key.as_str())
                .with_message(format!(
                    "Lock still contended after waiting {}ms",
                    timeout.as_millis()
                ))
        })
    }

    /// Run `f` while holding the key's lock, releasing on every exit path.
    pub fn run_exclusive<T, F>(&self, key: &SourceKey, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let _guard = self.acquire(key)?;
        f()
    }

    /// True if a pass currently holds the key's lock
    pub fn is_locked(&self, key: &SourceKey) -> bool {
        lock_map(&self.locks).contains_key(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_cycle() {
        let coordinator = SyncCoordinator::new();
        let key = SourceKey::new("roster");

        let guard = coordinator.acquire(&key).unwrap();
        assert!(coordinator.is_locked(&key));
        drop(guard);
        assert!(!coordinator.is_locked(&key));
    }

    #[test]
    fn test_second_acquire_fails_fast() {
        let coordinator = SyncCoordinator::new();
        let key = SourceKey::new("roster");

        let _guard = coordinator.acquire(&key).unwrap();
        let err = coordinator.acquire(&key).unwrap_err();
        assert_eq!(err.kind(), TsErrorKind::LockContention);
    }

    #[test]
    fn test_distinct_keys_are_independent() {
        let coordinator = SyncCoordinator::new();
        let _a = coordinator.acquire(&SourceKey::new("a")).unwrap();
        let _b = coordinator.acquire(&SourceKey::new("b")).unwrap();
        assert!(coordinator.is_locked(&SourceKey::new("a")));
        assert!(coordinator.is_locked(&SourceKey::new("b")));
    }

    #[test]
    fn test_run_exclusive_releases_on_error() {
        let coordinator = SyncCoordinator::new();
        let key = SourceKey::new("roster");

        let result: Result<()> = coordinator.run_exclusive(&key, || {
            Err(TsError::new(TsErrorKind::Internal).with_message("boom"))
        });
        assert!(result.is_err());
        assert!(!coordinator.is_locked(&key));
    }

    #[test]
    fn test_wait_expiry_clears_stale_holder() {
        let coordinator = SyncCoordinator::new();
        let key = SourceKey::new("roster");

        // Leak a guard to simulate a holder that never releases.
        let stale = coordinator.acquire(&key).unwrap();
        std::mem::forget(stale);

        let guard = coordinator
            .acquire_with_wait(&key, Duration::from_millis(120))
            .unwrap();
        assert!(coordinator.is_locked(&key));
        drop(guard);
        assert!(!coordinator.is_locked(&key));
    }
}
