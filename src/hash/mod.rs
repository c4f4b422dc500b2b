//! The tiered, open-addressed elastic hash table.
//!
//! Capacity is partitioned into a sequence of geometrically shrinking
//! levels (largest first); inserts cascade from the largest level to
//! smaller ones as each level's probe budget is exhausted, which keeps
//! expected probe counts low even as overall load approaches `max_load`.

mod hasher;
mod iter;
mod level;
mod rebuild;
mod slot;
mod stats;

use self::level::{build_levels, Level};
use self::slot::Slot;
use crate::config::{EhtConfig, GROW_FACTOR, MIN_TOTAL_CAPACITY};
use crate::error::{EhtError, Result};
use log::debug;
use std::fmt;

pub use self::iter::Iter;
pub use self::stats::LevelStats;

/// Truncates `key` at its first NUL byte, per the NUL-terminated key model
/// (§1, §6): embedded zero bytes end the key for hashing and matching.
#[inline]
fn normalize_key(key: &[u8]) -> &[u8] {
    match key.iter().position(|&b| b == 0) {
        Some(nul) => &key[..nul],
        None => key,
    }
}

/// A tiered elastic hash table mapping byte-string keys to owned byte-string
/// values. See the crate root for the full design.
pub struct ElasticHashTable {
    config: EhtConfig,
    total_capacity: usize,
    count: usize,
    levels: Vec<Level>,
}

impl ElasticHashTable {
    /// Creates a table for at least `requested_capacity` entries' worth of
    /// address space, using the default config (`min_level_size = 16`,
    /// `max_load = 0.90`, `tombstone_ratio = 0.15`). The requested capacity
    /// is clamped up to a floor of 64.
    pub fn create(requested_capacity: usize) -> Result<Self> {
        Self::create_with_config(requested_capacity, EhtConfig::default())
    }

    /// Like [`create`](Self::create), but with caller-supplied tunables.
    pub fn create_with_config(requested_capacity: usize, config: EhtConfig) -> Result<Self> {
        let total_capacity = requested_capacity.max(MIN_TOTAL_CAPACITY);
        let levels = build_levels(total_capacity, &config);
        debug!(
            "eht: created table total_capacity={} num_levels={}",
            total_capacity,
            levels.len()
        );
        Ok(Self {
            config,
            total_capacity,
            count: 0,
            levels,
        })
    }

    fn find(&self, key: &[u8]) -> Option<(usize, usize)> {
        for (level_idx, level) in self.levels.iter().enumerate() {
            if level.count == 0 {
                continue;
            }
            let budget = level.probe_budget();
            let (h1, h2) = level.dual_hash(key);
            for attempt in 0..budget as u64 {
                let idx = level.probe(h1, h2, attempt);
                match &level.slots[idx] {
                    Slot::Occupied { key: k, .. } if k.as_slice() == key => {
                        return Some((level_idx, idx));
                    }
                    Slot::Empty => break,
                    _ => {}
                }
            }
        }
        None
    }

    /// Inserts `value` under `key`, overwriting any existing value for that
    /// key in place. May trigger a growth or compaction rebuild first; see
    /// §4.4's insert ordering.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let key_trunc = normalize_key(key);

        if let Some((level_idx, slot_idx)) = self.find(key_trunc) {
            if let Slot::Occupied { value: v, .. } = &mut self.levels[level_idx].slots[slot_idx] {
                *v = value.to_vec();
            }
            return Ok(());
        }

        let load_threshold = (self.total_capacity as f64 * self.config.max_load()) as usize;
        if self.count >= load_threshold {
            let new_capacity = self
                .total_capacity
                .checked_mul(GROW_FACTOR)
                .ok_or(EhtError::CapacityOverflow)?;
            self.rebuild(new_capacity)?;
        }

        let tombstone_threshold =
            (self.total_capacity as f64 * self.config.tombstone_ratio()) as usize;
        let total_tombstones: usize = self.levels.iter().map(|l| l.tombstones).sum();
        if total_tombstones >= tombstone_threshold {
            self.rebuild(self.total_capacity)?;
        }

        self.insert_cascade(key_trunc.to_vec(), value.to_vec())
    }

    /// Owned-pointer insert cascade (§4.4 step 5-6): probes each level in
    /// order, claiming the first Empty or Tombstone slot within budget. If
    /// every level's budget is exhausted, grows the table 2x and retries
    /// with the same owned buffers — no recopy.
    fn insert_cascade(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        for level in self.levels.iter_mut() {
            let budget = level.probe_budget();
            let (h1, h2) = level.dual_hash(&key);
            for attempt in 0..budget as u64 {
                let idx = level.probe(h1, h2, attempt);
                let slot = &level.slots[idx];
                if slot.is_empty() || slot.is_tombstone() {
                    if slot.is_tombstone() {
                        level.tombstones -= 1;
                    }
                    level.slots[idx] = Slot::Occupied { key, value };
                    level.count += 1;
                    self.count += 1;
                    return Ok(());
                }
            }
        }

        let new_capacity = self
            .total_capacity
            .checked_mul(GROW_FACTOR)
            .ok_or(EhtError::CapacityOverflow)?;
        self.rebuild(new_capacity)?;
        self.insert_cascade(key, value)
    }

    /// Returns the value bytes stored under `key`, if present.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let (level_idx, slot_idx) = self.find(normalize_key(key))?;
        match &self.levels[level_idx].slots[slot_idx] {
            Slot::Occupied { value, .. } => Some(value.as_slice()),
            _ => unreachable!("find only ever returns occupied slots"),
        }
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        match self.find(normalize_key(key)) {
            Some((level_idx, slot_idx)) => {
                let level = &mut self.levels[level_idx];
                level.slots[slot_idx] = Slot::Tombstone;
                level.count -= 1;
                level.tombstones += 1;
                self.count -= 1;
                true
            }
            None => false,
        }
    }

    /// Returns whether `key` is present. No side effects.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(normalize_key(key)).is_some()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the table has no live entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total address-space capacity, summed across all levels.
    pub fn capacity(&self) -> usize {
        self.total_capacity
    }

    /// Number of levels in the current layout.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Per-level `(level, capacity, count, tombstones)` snapshots, for up
    /// to `max_levels` of them.
    pub fn level_stats(&self, max_levels: usize) -> Vec<LevelStats> {
        self.levels
            .iter()
            .take(max_levels)
            .map(|l| LevelStats {
                level: l.level,
                capacity: l.capacity,
                count: l.count,
                tombstones: l.tombstones,
            })
            .collect()
    }

    /// A scan across all live entries, in level-then-slot order. Not stable
    /// across any mutation of the table it borrows.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.levels)
    }

    /// Compacts the table to roughly `count / max_load`, the smallest
    /// capacity the current load factor allows, reusing the same rebuild
    /// machinery the automatic tombstone-ratio compaction uses. Not part of
    /// the original C API; a direct extension of the rebuild component for
    /// callers who want to reclaim space without waiting on the tombstone
    /// threshold.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let target = ((self.count as f64 / self.config.max_load()).ceil() as usize)
            .max(MIN_TOTAL_CAPACITY);
        self.rebuild(target)
    }
}

impl fmt::Debug for ElasticHashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticHashTable")
            .field("total_capacity", &self.total_capacity)
            .field("count", &self.count)
            .field("num_levels", &self.levels.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a ElasticHashTable {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
