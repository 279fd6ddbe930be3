//! Post store abstraction.
//!
//! The clustering engine never loads data itself. A `PostStore` answers the
//! two questions the map needs: which posts lie inside a viewport, and which
//! posts carry a given cached geohash prefix.

use crate::error::Result;
use geocluster_types::{BoundingBox, GeotaggedRecord};
use uuid::Uuid;

mod memory;

pub use memory::MemoryPostStore;

/// Trait for post store implementations.
///
/// Methods take `&self` so one store can serve concurrent viewport
/// requests; implementations handle their own locking.
pub trait PostStore: Send + Sync {
    /// Insert or replace a record, returning the previous version
    fn upsert(&self, record: GeotaggedRecord) -> Result<Option<GeotaggedRecord>>;

    /// Insert or replace many records
    fn upsert_many(&self, records: Vec<GeotaggedRecord>) -> Result<()> {
        for record in records {
            self.upsert(record)?;
        }
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<GeotaggedRecord>>;

    /// Remove a record; fails with `RecordNotFound` if absent
    fn remove(&self, id: &Uuid) -> Result<GeotaggedRecord>;

    /// Records whose coordinate lies inside `bbox` (edges inclusive), newest
    /// first. Records without a coordinate are never returned.
    fn records_within(&self, bbox: &BoundingBox) -> Result<Vec<GeotaggedRecord>>;

    /// Records whose cached geohash starts with `prefix`, newest first
    fn records_by_geohash_prefix(&self, prefix: &str) -> Result<Vec<GeotaggedRecord>>;

    /// Every stored record, in no particular order
    fn all(&self) -> Result<Vec<GeotaggedRecord>>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn stats(&self) -> Result<StoreStats>;
}

/// Post store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of records
    pub record_count: usize,
    /// Records that have a coordinate
    pub located_count: usize,
    /// Records that have a cached geohash
    pub geohashed_count: usize,
    /// Number of write operations performed
    pub operations_count: u64,
}

/// Newest first, ties by id.
pub(crate) fn sort_newest_first(records: &mut [GeotaggedRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
