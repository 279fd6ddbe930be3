//! Geohash backfill.
//!
//! Posts carry a denormalized coordinate and geohash so viewport queries stay
//! cheap. This module keeps them current: a post without its own coordinate
//! inherits its place's coordinate, and a missing or outdated geohash is
//! recomputed at full precision.

use crate::compute::geohash::{self, DEFAULT_PRECISION};
use crate::error::Result;
use crate::store::PostStore;
use geocluster_types::{GeoPoint, GeotaggedRecord};

/// Coordinates closer than this (per axis, degrees) count as unchanged.
pub const COORDINATE_TOLERANCE: f64 = 0.0001;

/// Outcome of a backfill run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Records examined
    pub scanned: usize,
    /// Records written back with a new coordinate or geohash
    pub updated: usize,
    /// Records with no coordinate from either the post or its place
    pub skipped: usize,
}

/// The coordinate a record should have: its own, else its place's.
pub fn resolve_coordinate(record: &GeotaggedRecord) -> Option<GeoPoint> {
    record
        .coordinate
        .or_else(|| record.place.as_ref().and_then(|p| p.coordinate))
}

/// Whether `record` needs its coordinate or geohash rewritten to match
/// `resolved`.
pub fn needs_refresh(record: &GeotaggedRecord, resolved: &GeoPoint) -> bool {
    let moved = match record.coordinate {
        None => true,
        Some(current) => current.max_axis_delta(resolved) > COORDINATE_TOLERANCE,
    };
    let missing_hash = record.geohash.as_deref().is_none_or(str::is_empty);

    moved || missing_hash
}

/// Bring one record's coordinate and geohash up to date.
///
/// Returns `true` if the record changed.
pub fn refresh_record(record: &mut GeotaggedRecord) -> bool {
    let Some(resolved) = resolve_coordinate(record) else {
        return false;
    };

    if !needs_refresh(record, &resolved) {
        return false;
    }

    record.coordinate = Some(resolved);
    record.geohash = Some(geohash::encode(
        resolved.latitude,
        resolved.longitude,
        DEFAULT_PRECISION,
    ));
    true
}

/// Refresh every record in `store`, writing back only the ones that changed.
pub fn backfill(store: &dyn PostStore) -> Result<BackfillReport> {
    let mut report = BackfillReport::default();
    let mut changed = Vec::new();

    for mut record in store.all()? {
        report.scanned += 1;

        if resolve_coordinate(&record).is_none() {
            report.skipped += 1;
            continue;
        }

        if refresh_record(&mut record) {
            changed.push(record);
        }
    }

    report.updated = changed.len();
    if !changed.is_empty() {
        store.upsert_many(changed)?;
    }

    log::info!(
        "geohash backfill: scanned={} updated={} skipped={}",
        report.scanned,
        report.updated,
        report.skipped
    );

    Ok(report)
}
