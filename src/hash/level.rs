//! Level (SubArray): a fixed-capacity slot array with its own probe budget.

use super::hasher::{dual_hash, probe_index};
use super::slot::Slot;
use crate::config::EhtConfig;

#[derive(Debug)]
pub(crate) struct Level {
    pub(crate) level: usize,
    pub(crate) capacity: usize,
    pub(crate) count: usize,
    pub(crate) tombstones: usize,
    pub(crate) slots: Vec<Slot>,
}

impl Level {
    fn new(level: usize, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Self {
            level,
            capacity,
            count: 0,
            tombstones: 0,
            slots,
        }
    }

    /// `budget = floor(3 + 3*ln(1/eps)^2) + 1`, clamped above by `capacity`,
    /// or an exhaustive scan of the level once vacancy hits zero.
    pub(crate) fn probe_budget(&self) -> usize {
        let used = (self.count + self.tombstones) as f64;
        let eps = 1.0 - used / self.capacity as f64;
        if eps <= 0.0 {
            return self.capacity;
        }
        let inv_eps = 1.0 / eps;
        let l = inv_eps.ln();
        let budget = 3.0 + 3.0 * l * l;
        let b = budget as u64 + 1;
        (b as usize).min(self.capacity)
    }

    #[inline]
    pub(crate) fn dual_hash(&self, key: &[u8]) -> (u64, u64) {
        dual_hash(key, self.level)
    }

    #[inline]
    pub(crate) fn probe(&self, h1: u64, h2: u64, attempt: u64) -> usize {
        probe_index(h1, h2, attempt, self.capacity)
    }
}

/// Builds the geometric sequence of level capacities for `total_capacity`
/// (§4.3): while the remainder exceeds `2*min_level_size`, emit a level of
/// half the remainder; then emit one final level for whatever is left.
pub(crate) fn build_levels(total_capacity: usize, config: &EhtConfig) -> Vec<Level> {
    let min_level_size = config.min_level_size();
    let mut sizes = Vec::new();
    let mut remaining = total_capacity;
    while remaining > 2 * min_level_size {
        let size = remaining / 2;
        sizes.push(size);
        remaining -= size;
    }
    sizes.push(remaining);

    sizes
        .into_iter()
        .enumerate()
        .map(|(level, capacity)| Level::new(level, capacity))
        .collect()
}
