//! Grow or compact: steal-pointer extraction, recomputed layout,
//! non-copying reinsertion.

use super::level::build_levels;
use super::slot::Slot;
use super::ElasticHashTable;
use crate::error::Result;
use log::{debug, trace};
use std::mem;

impl ElasticHashTable {
    /// Rebuilds the table at `new_capacity`, preserving every live entry.
    ///
    /// Extraction moves `(key, value)` buffers out of occupied slots rather
    /// than cloning them; teardown then relayout recomputes §4.3's level
    /// sequence; reinsertion replays the owned-pointer insert cascade with
    /// no update-in-place check, since the extracted keys are unique by
    /// construction.
    pub(crate) fn rebuild(&mut self, new_capacity: usize) -> Result<()> {
        debug!(
            "eht: rebuild total_capacity {} -> {} (live count {})",
            self.total_capacity, new_capacity, self.count
        );

        let mut extracted: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(self.count);
        for level in self.levels.iter_mut() {
            for slot in level.slots.iter_mut() {
                if matches!(slot, Slot::Occupied { .. }) {
                    if let Slot::Occupied { key, value } = mem::replace(slot, Slot::Empty) {
                        extracted.push((key, value));
                    }
                }
            }
        }

        self.total_capacity = new_capacity;
        self.levels = build_levels(new_capacity, &self.config);
        self.count = 0;

        trace!("eht: relayout produced {} levels", self.levels.len());

        for (key, value) in extracted {
            self.insert_cascade(key, value)?;
        }
        Ok(())
    }
}
