//! Viewport clustering for geotagged posts.
//!
//! Given the posts visible in a map viewport and a zoom level, produce a
//! bounded list of map markers. Low zooms group posts by geohash prefix,
//! high zooms by a uniform grid anchored at the viewport corner.
//!
//! ```rust
//! use geocluster::prelude::*;
//! use std::time::SystemTime;
//! use uuid::Uuid;
//!
//! let store = MemoryPostStore::new();
//! store.upsert(GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now()).at(41.0082, 28.9784))?;
//! store.upsert(GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now()).at(41.0090, 28.9790))?;
//!
//! let service = ClusterService::new(store);
//! let markers = service.clusters(&ClusterQuery::new(42.0, 40.0, 30.0, 28.0, 5))?;
//! assert_eq!(markers.len(), 1);
//! assert_eq!(markers[0].member_count, 2);
//! # Ok::<(), geocluster::ClusterError>(())
//! ```

pub mod backfill;
pub mod compute;
pub mod config;
pub mod error;
pub mod service;
pub mod store;

pub use backfill::{BackfillReport, backfill};
pub use compute::{ClusterEngine, Strategy};
pub use config::ClusterConfig;
pub use error::{ClusterError, Result};
pub use service::{ClusterQuery, ClusterService};
pub use store::{MemoryPostStore, PostStore, StoreStats};

pub use geocluster_types::{BoundingBox, ClusterSummary, GeoPoint, GeotaggedRecord, PlaceRef};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{ClusterConfig, ClusterEngine, ClusterError, Result};

    pub use crate::{ClusterQuery, ClusterService};

    pub use crate::{MemoryPostStore, PostStore};

    pub use crate::compute::geohash::{decode, encode};

    pub use geocluster_types::{BoundingBox, ClusterSummary, GeoPoint, GeotaggedRecord, PlaceRef};
}
