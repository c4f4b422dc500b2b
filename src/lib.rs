//! An in-memory elastic hash table: an open-addressed map whose address
//! space is split into geometrically shrinking levels, each with its own
//! probe budget derived from that level's residual vacancy. Inserts
//! cascade from the largest (densest) level down to smaller, sparser ones
//! instead of letting any single level saturate, after Farach-Colton et
//! al.'s elastic hashing scheme.

/// Tunables governing level layout, probe budgets, and rebuild thresholds.
pub mod config;
/// Error and result types returned by fallible operations.
pub mod error;
/// The tiered, open-addressed table itself.
pub mod hash;

pub use error::{EhtError, Result};
pub use hash::{ElasticHashTable, Iter, LevelStats};
