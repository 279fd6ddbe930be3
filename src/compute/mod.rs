//! Compute layer: geohash codec, zoom policy, validation and clustering.
//!
//! Everything here is pure and synchronous. Storage and request handling
//! live in [`crate::store`] and [`crate::service`].

pub mod cluster;
pub mod geohash;
pub mod validation;
pub mod zoom;

pub use cluster::{ClusterEngine, Clusterer, GeohashClusterer, TileClusterer};
pub use geohash::{GeohashBounds, decode, decode_bounds, encode};
pub use zoom::{CellSize, Strategy, cell_size_for_zoom, prefix_length_for_zoom};
