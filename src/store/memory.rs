//! In-memory post store.

use super::{PostStore, StoreStats, sort_newest_first};
use crate::compute::geohash;
use crate::compute::validation::validate_geographic_point;
use crate::error::{ClusterError, Result};
use geocluster_types::{BoundingBox, GeotaggedRecord};
use parking_lot::RwLock;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use uuid::Uuid;

/// `[longitude, latitude]` tagged with the record id
type IndexedPoint = GeomWithData<[f64; 2], Uuid>;

#[derive(Default)]
struct Inner {
    records: FxHashMap<Uuid, GeotaggedRecord>,
    points: RTree<IndexedPoint>,
    /// `(lowercased cached geohash, id)`, ordered for prefix range scans
    geohashes: BTreeSet<(String, Uuid)>,
    operations_count: u64,
}

impl Inner {
    fn index(&mut self, record: &GeotaggedRecord) {
        if let Some(coord) = record.coordinate {
            self.points
                .insert(IndexedPoint::new([coord.longitude, coord.latitude], record.id));
        }
        if let Some(hash) = record.geohash.as_ref().filter(|h| !h.is_empty()) {
            self.geohashes
                .insert((hash.to_ascii_lowercase(), record.id));
        }
    }

    fn unindex(&mut self, record: &GeotaggedRecord) {
        if let Some(coord) = record.coordinate {
            self.points
                .remove(&IndexedPoint::new([coord.longitude, coord.latitude], record.id));
        }
        if let Some(hash) = record.geohash.as_ref() {
            self.geohashes
                .remove(&(hash.to_ascii_lowercase(), record.id));
        }
    }

    fn collect(&self, ids: impl Iterator<Item = Uuid>) -> Vec<GeotaggedRecord> {
        let mut found: Vec<GeotaggedRecord> = ids
            .filter_map(|id| self.records.get(&id).cloned())
            .collect();
        sort_newest_first(&mut found);
        found
    }
}

/// Thread-safe in-memory post store.
///
/// Coordinates live in an R-tree for viewport queries and cached geohashes
/// in an ordered set for prefix scans. Both indexes are kept in step with
/// the record map on every write.
///
/// # Examples
///
/// ```rust
/// use geocluster::store::{MemoryPostStore, PostStore};
/// use geocluster_types::{BoundingBox, GeotaggedRecord};
/// use std::time::SystemTime;
/// use uuid::Uuid;
///
/// let store = MemoryPostStore::new();
/// store.upsert(GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now()).at(41.0, 29.0))?;
///
/// let visible = store.records_within(&BoundingBox::new(42.0, 40.0, 30.0, 28.0))?;
/// assert_eq!(visible.len(), 1);
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
#[derive(Default)]
pub struct MemoryPostStore {
    inner: RwLock<Inner>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an initial set of records.
    pub fn from_records(records: impl IntoIterator<Item = GeotaggedRecord>) -> Result<Self> {
        let store = Self::new();
        for record in records {
            store.upsert(record)?;
        }
        Ok(store)
    }
}

impl PostStore for MemoryPostStore {
    fn upsert(&self, record: GeotaggedRecord) -> Result<Option<GeotaggedRecord>> {
        if let Some(coord) = record.coordinate.as_ref() {
            validate_geographic_point(coord).map_err(|e| {
                ClusterError::InvalidInput(format!("Record {}: {}", record.id, e))
            })?;
        }

        let mut inner = self.inner.write();
        let previous = inner.records.remove(&record.id);
        if let Some(old) = previous.as_ref() {
            inner.unindex(old);
        }

        inner.index(&record);
        inner.records.insert(record.id, record);
        inner.operations_count += 1;

        Ok(previous)
    }

    fn get(&self, id: &Uuid) -> Result<Option<GeotaggedRecord>> {
        Ok(self.inner.read().records.get(id).cloned())
    }

    fn remove(&self, id: &Uuid) -> Result<GeotaggedRecord> {
        let mut inner = self.inner.write();
        let record = inner
            .records
            .remove(id)
            .ok_or(ClusterError::RecordNotFound(*id))?;
        inner.unindex(&record);
        inner.operations_count += 1;
        Ok(record)
    }

    fn records_within(&self, bbox: &BoundingBox) -> Result<Vec<GeotaggedRecord>> {
        // AABB would silently normalize an inverted box
        if !(bbox.north >= bbox.south && bbox.east >= bbox.west) {
            return Ok(Vec::new());
        }

        let envelope = AABB::from_corners([bbox.west, bbox.south], [bbox.east, bbox.north]);
        let inner = self.inner.read();
        let ids = inner
            .points
            .locate_in_envelope_intersecting(&envelope)
            .map(|p| p.data);
        Ok(inner.collect(ids))
    }

    fn records_by_geohash_prefix(&self, prefix: &str) -> Result<Vec<GeotaggedRecord>> {
        let prefix = geohash::parse(prefix)?;

        let inner = self.inner.read();
        let ids = inner
            .geohashes
            .range((prefix.clone(), Uuid::nil())..)
            .take_while(|(hash, _)| hash.starts_with(&prefix))
            .map(|(_, id)| *id);
        Ok(inner.collect(ids))
    }

    fn all(&self) -> Result<Vec<GeotaggedRecord>> {
        Ok(self.inner.read().records.values().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.inner.read().records.len())
    }

    fn stats(&self) -> Result<StoreStats> {
        let inner = self.inner.read();
        Ok(StoreStats {
            record_count: inner.records.len(),
            located_count: inner.points.size(),
            geohashed_count: inner.geohashes.len(),
            operations_count: inner.operations_count,
        })
    }
}
