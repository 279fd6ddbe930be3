//! Viewport clustering.
//!
//! [`ClusterEngine::compute`] turns the records visible in a viewport into
//! at most `max_clusters` map markers:
//!
//! ```text
//! bbox, zoom, records
//!   -> reject degenerate viewport (empty result)
//!   -> clamp zoom, drop records without a coordinate
//!   -> zoom <= 9 ? geohash prefix grouping : viewport tile grouping
//!   -> centroid + newest-first sample per group
//!   -> sort by member count, keep the densest max_clusters
//! ```
//!
//! Both strategies share one accumulator, so they differ only in the key
//! they group by. The engine holds no mutable state; one instance can
//! serve concurrent requests.

mod aggregate;
pub mod geohash;
pub mod tile;

use crate::compute::validation::is_valid_viewport;
use crate::compute::zoom::{Strategy, clamp_zoom};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};
use aggregate::GroupAccumulator;
use geocluster_types::{BoundingBox, ClusterSummary, GeotaggedRecord};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

pub use self::geohash::GeohashClusterer;
pub use self::tile::TileClusterer;

/// A grouping strategy over coordinate-bearing records.
pub trait Clusterer {
    /// Group `records` and summarize every group. Output order is unspecified.
    fn cluster(&self, records: &[&GeotaggedRecord], config: &ClusterConfig) -> Vec<ClusterSummary>;
}

impl Strategy {
    /// Run this strategy's clusterer.
    pub fn run(&self, records: &[&GeotaggedRecord], config: &ClusterConfig) -> Vec<ClusterSummary> {
        match *self {
            Strategy::Geohash { prefix_len } => {
                GeohashClusterer::new(prefix_len).cluster(records, config)
            }
            Strategy::Tile { south, west, cell } => {
                TileClusterer::new(south, west, cell).cluster(records, config)
            }
        }
    }
}

fn group_sequential<'a, K, F>(
    records: &[&'a GeotaggedRecord],
    key_fn: &F,
    limit: usize,
) -> FxHashMap<K, GroupAccumulator<'a>>
where
    K: Eq + Hash,
    F: Fn(&'a GeotaggedRecord) -> Option<K>,
{
    let mut groups: FxHashMap<K, GroupAccumulator<'a>> = FxHashMap::default();

    for &record in records {
        let Some(key) = key_fn(record) else {
            continue;
        };
        match groups.entry(key) {
            Entry::Occupied(mut e) => e.get_mut().add(record),
            Entry::Vacant(e) => {
                e.insert(GroupAccumulator::new(record, limit));
            }
        }
    }

    groups
}

#[cfg(feature = "parallel")]
fn merge_groups<'a, K: Eq + Hash>(
    mut into: FxHashMap<K, GroupAccumulator<'a>>,
    mut from: FxHashMap<K, GroupAccumulator<'a>>,
) -> FxHashMap<K, GroupAccumulator<'a>> {
    if into.len() < from.len() {
        std::mem::swap(&mut into, &mut from);
    }
    for (key, acc) in from {
        match into.entry(key) {
            Entry::Occupied(e) => e.into_mut().merge(acc),
            Entry::Vacant(e) => {
                e.insert(acc);
            }
        }
    }
    into
}

#[cfg(feature = "parallel")]
fn group_parallel<'a, K, F>(
    records: &[&'a GeotaggedRecord],
    key_fn: &F,
    limit: usize,
) -> FxHashMap<K, GroupAccumulator<'a>>
where
    K: Eq + Hash + Send,
    F: Fn(&'a GeotaggedRecord) -> Option<K> + Sync,
{
    use rayon::prelude::*;

    let chunk = (records.len() / rayon::current_num_threads().max(1)).max(1024);
    records
        .par_chunks(chunk)
        .map(|part| group_sequential(part, key_fn, limit))
        .reduce(FxHashMap::default, merge_groups)
}

/// Group records by key into accumulators, in parallel when the `parallel`
/// feature is on and the input is large enough.
pub(crate) fn group_records<'a, K, F>(
    records: &[&'a GeotaggedRecord],
    key_fn: F,
    config: &ClusterConfig,
) -> FxHashMap<K, GroupAccumulator<'a>>
where
    K: Eq + Hash + Send,
    F: Fn(&'a GeotaggedRecord) -> Option<K> + Sync,
{
    #[cfg(feature = "parallel")]
    if records.len() >= config.parallel_threshold {
        return group_parallel(records, &key_fn, config.max_samples);
    }

    group_sequential(records, &key_fn, config.max_samples)
}

/// The clustering orchestrator.
///
/// # Examples
///
/// ```rust
/// use geocluster::ClusterEngine;
/// use geocluster_types::{BoundingBox, GeotaggedRecord};
/// use std::time::SystemTime;
/// use uuid::Uuid;
///
/// let engine = ClusterEngine::new();
/// let records = vec![
///     GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now()).at(41.0, 29.0),
///     GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now()).at(41.0001, 29.0001),
/// ];
/// let bbox = BoundingBox::new(42.0, 40.0, 30.0, 28.0);
///
/// let clusters = engine.compute(&bbox, 5, &records);
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].member_count, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: ClusterConfig,
}

impl ClusterEngine {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClusterConfig) -> Result<Self> {
        config.validate().map_err(ClusterError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// The strategy `compute` would use, or `None` for a degenerate viewport.
    pub fn strategy_for(&self, bbox: &BoundingBox, zoom: i32) -> Option<Strategy> {
        if !is_valid_viewport(bbox) {
            return None;
        }
        let zoom = clamp_zoom(zoom, self.config.max_zoom);
        Some(Strategy::select(zoom, bbox, &self.config))
    }

    /// Cluster `records` for the viewport, densest first, capped at
    /// `max_clusters` entries.
    ///
    /// Never fails: a degenerate viewport yields an empty result, zoom is
    /// clamped and records without a coordinate are dropped. Records are
    /// assumed to already lie inside `bbox`.
    pub fn compute(
        &self,
        bbox: &BoundingBox,
        zoom: i32,
        records: &[GeotaggedRecord],
    ) -> Vec<ClusterSummary> {
        let mut clusters = self.cluster_all(bbox, zoom, records);
        let total = clusters.len();

        clusters.sort_unstable_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then_with(|| a.latitude().total_cmp(&b.latitude()))
                .then_with(|| a.longitude().total_cmp(&b.longitude()))
        });
        clusters.truncate(self.config.max_clusters);

        if clusters.len() < total {
            log::debug!(
                "trimmed {} clusters to the densest {}",
                total,
                clusters.len()
            );
        }

        clusters
    }

    /// Every group for the viewport, unordered and untrimmed.
    pub fn cluster_all(
        &self,
        bbox: &BoundingBox,
        zoom: i32,
        records: &[GeotaggedRecord],
    ) -> Vec<ClusterSummary> {
        let Some(strategy) = self.strategy_for(bbox, zoom) else {
            log::debug!("degenerate viewport {:?}, returning no clusters", bbox);
            return Vec::new();
        };

        let located: Vec<&GeotaggedRecord> = records
            .iter()
            .filter(|r| r.coordinate.is_some())
            .collect();

        if located.is_empty() {
            return Vec::new();
        }

        let clusters = strategy.run(&located, &self.config);

        log::debug!(
            "{} strategy at zoom {}: {} records ({} located) -> {} clusters",
            strategy.name(),
            clamp_zoom(zoom, self.config.max_zoom),
            records.len(),
            located.len(),
            clusters.len()
        );

        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use uuid::Uuid;

    fn record(lat: f64, lng: f64, secs: u64) -> GeotaggedRecord {
        GeotaggedRecord::new(Uuid::new_v4(), UNIX_EPOCH + Duration::from_secs(secs)).at(lat, lng)
    }

    fn grid(n: usize, bbox: &BoundingBox) -> Vec<GeotaggedRecord> {
        let side = (n as f64).sqrt().ceil() as usize;
        (0..n)
            .map(|i| {
                let fx = (i % side) as f64 / side as f64;
                let fy = (i / side) as f64 / side as f64;
                record(
                    bbox.south + fy * bbox.lat_span(),
                    bbox.west + fx * bbox.lng_span(),
                    i as u64,
                )
            })
            .collect()
    }

    #[test]
    fn test_degenerate_bbox_is_empty() {
        let engine = ClusterEngine::new();
        let records = vec![record(10.0, 10.0, 1)];
        let bbox = BoundingBox::new(10.0, 10.0, 20.0, 5.0);
        assert!(engine.compute(&bbox, 5, &records).is_empty());

        let bbox = BoundingBox::new(20.0, 10.0, 5.0, 20.0);
        assert!(engine.compute(&bbox, 5, &records).is_empty());
        assert!(engine.strategy_for(&bbox, 5).is_none());
    }

    #[test]
    fn test_records_without_coordinates_dropped() {
        let engine = ClusterEngine::new();
        let records = vec![
            GeotaggedRecord::new(Uuid::new_v4(), UNIX_EPOCH),
            GeotaggedRecord::new(Uuid::new_v4(), UNIX_EPOCH).with_geohash("sxk3"),
        ];
        let bbox = BoundingBox::world();
        assert!(engine.compute(&bbox, 3, &records).is_empty());
        assert!(engine.compute(&bbox, 15, &records).is_empty());
    }

    #[test]
    fn test_single_record_tile() {
        let engine = ClusterEngine::new();
        let records = vec![record(41.0, 29.0, 1).with_place_name("X")];
        let bbox = BoundingBox::new(41.01, 40.99, 29.01, 28.99);

        let clusters = engine.compute(&bbox, 15, &records);
        assert_eq!(clusters.len(), 1);
        assert!(!clusters[0].is_cluster);
        assert_eq!(clusters[0].member_count, 1);
        assert_eq!(clusters[0].place_name.as_deref(), Some("X"));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let engine = ClusterEngine::new();
        let bbox = BoundingBox::new(42.0, 40.0, 30.0, 28.0);

        assert_eq!(
            engine.strategy_for(&bbox, -4),
            Some(Strategy::Geohash { prefix_len: 3 })
        );
        assert_eq!(engine.strategy_for(&bbox, 40), engine.strategy_for(&bbox, 18));
    }

    #[test]
    fn test_strategy_threshold() {
        let engine = ClusterEngine::new();
        let bbox = BoundingBox::new(42.0, 40.0, 30.0, 28.0);

        assert!(matches!(
            engine.strategy_for(&bbox, 9),
            Some(Strategy::Geohash { .. })
        ));
        assert!(matches!(
            engine.strategy_for(&bbox, 10),
            Some(Strategy::Tile { .. })
        ));
    }

    #[test]
    fn test_cap_and_order() {
        let engine = ClusterEngine::with_config(ClusterConfig::default().with_max_clusters(5)).unwrap();
        let bbox = BoundingBox::new(41.0, 40.0, 30.0, 29.0);

        let mut records = grid(400, &bbox);
        // Pile extra records onto one spot so it is clearly the densest.
        for i in 0..20 {
            records.push(record(40.5, 29.5, 1000 + i));
        }

        let clusters = engine.compute(&bbox, 16, &records);
        assert_eq!(clusters.len(), 5);
        assert!(clusters[0].member_count >= 20);
        for pair in clusters.windows(2) {
            assert!(pair[0].member_count >= pair[1].member_count);
        }
    }

    #[test]
    fn test_member_conservation_both_strategies() {
        let engine = ClusterEngine::new();
        let bbox = BoundingBox::new(41.3, 40.7, 29.5, 28.5);
        let mut records = grid(2_000, &bbox);
        records.push(GeotaggedRecord::new(Uuid::new_v4(), UNIX_EPOCH));

        for zoom in [0, 5, 9, 10, 14, 18] {
            let total: usize = engine
                .cluster_all(&bbox, zoom, &records)
                .iter()
                .map(|c| c.member_count)
                .sum();
            assert_eq!(total, 2_000, "zoom {zoom}");
        }
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = ClusterConfig {
            max_samples: 0,
            ..ClusterConfig::default()
        };
        assert!(matches!(
            ClusterEngine::with_config(config),
            Err(ClusterError::Config(_))
        ));
    }

    #[test]
    fn test_sample_limit_from_config() {
        let engine = ClusterEngine::with_config(ClusterConfig::default().with_max_samples(3)).unwrap();
        let records: Vec<_> = (0..8).map(|i| record(41.0, 29.0, i)).collect();
        let bbox = BoundingBox::new(42.0, 40.0, 30.0, 28.0);

        let clusters = engine.compute(&bbox, 4, &records);
        assert_eq!(clusters.len(), 1);
        assert_eq!(
            clusters[0].sample_ids,
            vec![records[7].id, records[6].id, records[5].id]
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_grouping_matches_sequential() {
        let bbox = BoundingBox::new(42.0, 36.0, 44.0, 26.0);
        // Repeating timestamps so sample ties fall back to id order
        let records: Vec<_> = grid(20_000, &bbox)
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.created_at = UNIX_EPOCH + Duration::from_secs((i % 700) as u64);
                r
            })
            .collect();

        let sequential = ClusterEngine::new();
        let parallel =
            ClusterEngine::with_config(ClusterConfig::default().with_parallel_threshold(1))
                .unwrap();

        // Centroid sums may differ in the last bit, so groups are matched by
        // their newest sample rather than by output position.
        let by_newest = |mut clusters: Vec<ClusterSummary>| {
            clusters.sort_by_key(|c| c.sample_ids[0]);
            clusters
        };

        for zoom in [3, 9, 12, 18] {
            let a = by_newest(sequential.cluster_all(&bbox, zoom, &records));
            let b = by_newest(parallel.cluster_all(&bbox, zoom, &records));
            assert!(!a.is_empty(), "zoom {zoom}");
            assert_eq!(a.len(), b.len(), "zoom {zoom}");

            for (x, y) in a.iter().zip(&b) {
                assert_eq!(x.member_count, y.member_count, "zoom {zoom}");
                assert_eq!(x.sample_ids, y.sample_ids, "zoom {zoom}");
                assert!((x.latitude() - y.latitude()).abs() < 1e-9, "zoom {zoom}");
                assert!((x.longitude() - y.longitude()).abs() < 1e-9, "zoom {zoom}");
            }

            let total: usize = b.iter().map(|c| c.member_count).sum();
            assert_eq!(total, 20_000, "zoom {zoom}");

            let counts = |clusters: Vec<ClusterSummary>| -> Vec<usize> {
                clusters.iter().map(|c| c.member_count).collect()
            };
            assert_eq!(
                counts(sequential.compute(&bbox, zoom, &records)),
                counts(parallel.compute(&bbox, zoom, &records)),
                "zoom {zoom}"
            );
        }
    }
}
