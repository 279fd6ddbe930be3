//! Zoom level policy: how coarse clustering should be at a given map scale.

use crate::config::ClusterConfig;
use geocluster_types::BoundingBox;

pub const MIN_ZOOM: i32 = 0;

const DEFAULT_MIN_CELL_SIZE: f64 = 0.001;
const DEFAULT_MAX_CELL_SIZE: f64 = 1.0;

/// Zoom levels below this use a single cell spanning the viewport.
const TILE_BASE_ZOOM: i32 = 6;

/// Geohash prefix length used for grouping at `zoom`.
///
/// | zoom   | prefix | roughly          |
/// |--------|--------|------------------|
/// | ..=3   | 3      | country          |
/// | 4..=5  | 4      | region           |
/// | 6..=7  | 5      | province         |
/// | 8..=9  | 6      | city             |
/// | 10..=11| 7      | district         |
/// | 12..=13| 8      | neighbourhood    |
/// | 14..   | 9      | street           |
pub fn prefix_length_for_zoom(zoom: i32) -> usize {
    match zoom {
        ..=3 => 3,
        ..=5 => 4,
        ..=7 => 5,
        ..=9 => 6,
        ..=11 => 7,
        ..=13 => 8,
        _ => 9,
    }
}

/// Tile edge lengths in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub lat: f64,
    pub lng: f64,
}

/// Tile size for `zoom` over a viewport of the given extent, clamped to
/// [0.001, 1.0] degrees per axis.
pub fn cell_size_for_zoom(zoom: i32, lat_range: f64, lng_range: f64) -> CellSize {
    cell_size_with_limits(
        zoom,
        lat_range,
        lng_range,
        DEFAULT_MIN_CELL_SIZE,
        DEFAULT_MAX_CELL_SIZE,
    )
}

/// Same as [`cell_size_for_zoom`] with explicit clamp limits.
pub fn cell_size_with_limits(
    zoom: i32,
    lat_range: f64,
    lng_range: f64,
    min_cell: f64,
    max_cell: f64,
) -> CellSize {
    let cell_count = 2f64.powi((zoom - TILE_BASE_ZOOM).max(0));
    // max/min rather than f64::clamp so a NaN range lands on max_cell
    let clamp = |size: f64| min_cell.max(max_cell.min(size));

    CellSize {
        lat: clamp(lat_range / cell_count),
        lng: clamp(lng_range / cell_count),
    }
}

/// Clamp a caller-supplied zoom into `[0, max_zoom]`.
pub fn clamp_zoom(zoom: i32, max_zoom: i32) -> i32 {
    zoom.clamp(MIN_ZOOM, max_zoom.max(MIN_ZOOM))
}

/// The grouping strategy chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Group by the first `prefix_len` geohash symbols
    Geohash { prefix_len: usize },
    /// Group by uniform grid cell relative to the viewport's south-west corner
    Tile {
        south: f64,
        west: f64,
        cell: CellSize,
    },
}

impl Strategy {
    /// Pick the strategy for an already clamped zoom and a valid viewport.
    pub fn select(zoom: i32, bbox: &BoundingBox, config: &ClusterConfig) -> Self {
        if zoom <= config.geohash_max_zoom {
            Strategy::Geohash {
                prefix_len: prefix_length_for_zoom(zoom),
            }
        } else {
            Strategy::Tile {
                south: bbox.south,
                west: bbox.west,
                cell: cell_size_with_limits(
                    zoom,
                    bbox.lat_span(),
                    bbox.lng_span(),
                    config.min_cell_size,
                    config.max_cell_size,
                ),
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Geohash { .. } => "geohash",
            Strategy::Tile { .. } => "tile",
        }
    }
}
