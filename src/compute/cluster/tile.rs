//! Fine clustering on a uniform grid anchored at the viewport.

use super::{Clusterer, group_records};
use crate::compute::zoom::CellSize;
use crate::config::ClusterConfig;
use geocluster_types::{ClusterSummary, GeotaggedRecord};

/// Groups records by grid cell. Cells are counted from the viewport's
/// south-west corner, so the grid moves with the viewport.
///
/// A cell holding exactly one record carries that record's place id, place
/// name and city, letting the client draw a precise pin instead of an area
/// marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileClusterer {
    pub south: f64,
    pub west: f64,
    pub cell: CellSize,
}

impl TileClusterer {
    pub fn new(south: f64, west: f64, cell: CellSize) -> Self {
        Self { south, west, cell }
    }

    /// `(cell_x, cell_y)` of a record, or `None` without a coordinate.
    pub fn cell_of(&self, record: &GeotaggedRecord) -> Option<(i64, i64)> {
        let coord = record.coordinate?;
        let x = ((coord.longitude - self.west) / self.cell.lng).floor() as i64;
        let y = ((coord.latitude - self.south) / self.cell.lat).floor() as i64;
        Some((x, y))
    }
}

impl Clusterer for TileClusterer {
    fn cluster(&self, records: &[&GeotaggedRecord], config: &ClusterConfig) -> Vec<ClusterSummary> {
        let groups = group_records(records, |record| self.cell_of(record), config);

        log::trace!(
            "tile grid {:.5}x{:.5} grouped {} records into {} cells",
            self.cell.lat,
            self.cell.lng,
            records.len(),
            groups.len()
        );

        groups.into_values().map(|acc| acc.finish(true)).collect()
    }
}
