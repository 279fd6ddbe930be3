//! # geocluster-types
//!
//! Core data types for the geocluster viewport clustering engine.
//!
//! - **Points and viewports**: `GeoPoint`, `BoundingBox`
//! - **Input records**: `GeotaggedRecord`, `PlaceRef`
//! - **Output**: `ClusterSummary`
//!
//! All types are serializable with Serde and convert to and from the `geo`
//! crate's primitives where a geometric counterpart exists.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::bbox::BoundingBox;
//! use geocluster_types::point::GeoPoint;
//!
//! let ankara = GeoPoint::new(39.9334, 32.8597);
//! let turkey = BoundingBox::new(42.1, 35.8, 44.8, 25.6);
//! assert!(turkey.contains(&ankara));
//! ```

pub mod bbox;
pub mod cluster;
pub mod point;
pub mod record;

pub use bbox::BoundingBox;
pub use cluster::ClusterSummary;
pub use point::GeoPoint;
pub use record::{GeotaggedRecord, PlaceRef};
