//! Fast and slow rebuild work sets.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::voxels::coordinate::ChunkKey;

/// The two pending sets. Both are drained oldest request first.
struct RebuildSets {
    /// Chunks whose rebuild must finish before the next frame renders
    fast: LruCache<ChunkKey, ()>,
    /// Chunks whose rebuild may be spread over several frames
    slow: LruCache<ChunkKey, ()>,
}

/// The single authority on when a chunk rebuild runs.
///
/// Chunks enqueue their own key; the owning `ChunkManager` drains the sets once
/// per update. A key is pending in at most one set at a time:
///
/// - a fast request supersedes a pending slow one
/// - a slow request for a key already pending fast is absorbed
/// - repeating a pending request changes nothing, including its queue position
pub struct RebuildScheduler {
    sets: Mutex<RebuildSets>,
}

impl Default for RebuildScheduler {
    fn default() -> Self {
        RebuildScheduler {
            sets: Mutex::new(RebuildSets {
                fast: LruCache::unbounded(),
                slow: LruCache::unbounded(),
            }),
        }
    }
}

impl RebuildScheduler {
    /// Creates a scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    fn sets(&self) -> MutexGuard<'_, RebuildSets> {
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues `key` for a fast rebuild.
    ///
    /// # Returns
    ///
    /// `true` if the key was not already pending fast.
    pub fn rebuild_fast(&self, key: ChunkKey) -> bool {
        let mut sets = self.sets();
        sets.slow.pop(&key);
        if sets.fast.contains(&key) {
            return false;
        }
        sets.fast.put(key, ());
        true
    }

    /// Enqueues `key` for a slow rebuild.
    ///
    /// # Returns
    ///
    /// `true` if the key was not already pending in either set.
    pub fn rebuild_slow(&self, key: ChunkKey) -> bool {
        let mut sets = self.sets();
        if sets.fast.contains(&key) || sets.slow.contains(&key) {
            return false;
        }
        sets.slow.put(key, ());
        true
    }

    /// Removes and returns every pending fast key, oldest first.
    pub fn take_fast(&self) -> Vec<ChunkKey> {
        let mut sets = self.sets();
        std::iter::from_fn(|| sets.fast.pop_lru().map(|(key, _)| key)).collect()
    }

    /// Removes and returns up to `limit` pending slow keys, oldest first.
    pub fn take_slow(&self, limit: usize) -> Vec<ChunkKey> {
        let mut sets = self.sets();
        std::iter::from_fn(|| sets.slow.pop_lru().map(|(key, _)| key))
            .take(limit)
            .collect()
    }

    /// Drops any pending request for `key`. Called when its chunk is evicted.
    pub fn forget(&self, key: ChunkKey) {
        let mut sets = self.sets();
        sets.fast.pop(&key);
        sets.slow.pop(&key);
    }

    /// Pending fast keys, oldest first.
    pub fn pending_fast(&self) -> Vec<ChunkKey> {
        let sets = self.sets();
        sets.fast.iter().rev().map(|(key, _)| *key).collect()
    }

    /// Pending slow keys, oldest first.
    pub fn pending_slow(&self) -> Vec<ChunkKey> {
        let sets = self.sets();
        sets.slow.iter().rev().map(|(key, _)| *key).collect()
    }

    /// Returns `true` when nothing is pending.
    pub fn is_idle(&self) -> bool {
        let sets = self.sets();
        sets.fast.is_empty() && sets.slow.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    #[test]
    fn repeated_requests_are_idempotent() {
        let scheduler = RebuildScheduler::new();
        let a = Point3::new(0, 0, 0);
        let b = Point3::new(1, 0, 0);

        assert!(scheduler.rebuild_slow(a));
        assert!(scheduler.rebuild_slow(b));
        assert!(!scheduler.rebuild_slow(a));
        assert_eq!(scheduler.pending_slow(), vec![a, b]);
    }

    #[test]
    fn a_key_is_pending_in_one_set_at_most() {
        let scheduler = RebuildScheduler::new();
        let key = Point3::new(2, -1, 3);

        assert!(scheduler.rebuild_slow(key));
        assert!(scheduler.rebuild_fast(key));
        assert!(scheduler.pending_slow().is_empty());
        assert!(!scheduler.rebuild_slow(key));
        assert_eq!(scheduler.pending_fast(), vec![key]);
        assert!(scheduler.pending_slow().is_empty());
    }

    #[test]
    fn slow_set_drains_in_bounded_batches() {
        let scheduler = RebuildScheduler::new();
        for x in 0..5 {
            scheduler.rebuild_slow(Point3::new(x, 0, 0));
        }

        assert_eq!(
            scheduler.take_slow(2),
            vec![Point3::new(0, 0, 0), Point3::new(1, 0, 0)]
        );
        assert_eq!(scheduler.pending_slow().len(), 3);
        assert_eq!(scheduler.take_slow(10).len(), 3);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn forgotten_keys_are_never_drained() {
        let scheduler = RebuildScheduler::new();
        let key = Point3::new(0, 0, 0);
        scheduler.rebuild_fast(key);
        scheduler.rebuild_slow(Point3::new(5, 0, 0));

        scheduler.forget(key);
        scheduler.forget(Point3::new(5, 0, 0));

        assert!(scheduler.take_fast().is_empty());
        assert!(scheduler.take_slow(usize::MAX).is_empty());
    }
}
