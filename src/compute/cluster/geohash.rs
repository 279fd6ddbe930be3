//! Coarse clustering by shared geohash prefix.

use super::{Clusterer, group_records};
use crate::compute::geohash::effective_geohash;
use crate::config::ClusterConfig;
use geocluster_types::{ClusterSummary, GeotaggedRecord};

/// Groups records whose geohashes share the first `prefix_len` symbols.
///
/// Cell boundaries are fixed on the globe, so markers stay put while the
/// user pans at low zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeohashClusterer {
    pub prefix_len: usize,
}

impl GeohashClusterer {
    pub fn new(prefix_len: usize) -> Self {
        Self { prefix_len }
    }
}

impl Clusterer for GeohashClusterer {
    fn cluster(&self, records: &[&GeotaggedRecord], config: &ClusterConfig) -> Vec<ClusterSummary> {
        let prefix_len = self.prefix_len;
        let groups = group_records(
            records,
            |record| effective_geohash(record, prefix_len).map(|hash| hash.into_owned()),
            config,
        );

        log::trace!(
            "geohash prefix {} grouped {} records into {} cells",
            prefix_len,
            records.len(),
            groups.len()
        );

        groups.into_values().map(|acc| acc.finish(false)).collect()
    }
}
