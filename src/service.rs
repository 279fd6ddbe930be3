//! Viewport request handling.
//!
//! Binds a [`PostStore`] to a [`ClusterEngine`]: a map client sends a
//! viewport and zoom, the service loads the visible posts and returns the
//! clustered markers.

use crate::compute::ClusterEngine;
use crate::compute::zoom::clamp_zoom;
use crate::error::{ClusterError, Result};
use crate::store::PostStore;
use geocluster_types::{BoundingBox, ClusterSummary};
use serde::Deserialize;

/// Zoom used when the request names none.
pub const DEFAULT_ZOOM: i32 = 10;

/// A viewport request, as sent by a map client.
///
/// Every field is optional; missing edges fall back to the whole world.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterQuery {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
    pub zoom: Option<i32>,
}

impl ClusterQuery {
    pub fn new(north: f64, south: f64, east: f64, west: f64, zoom: i32) -> Self {
        Self {
            north: Some(north),
            south: Some(south),
            east: Some(east),
            west: Some(west),
            zoom: Some(zoom),
        }
    }

    /// Fill in defaults, check the edges and clamp the zoom.
    pub fn resolve(&self, max_zoom: i32) -> Result<(BoundingBox, i32)> {
        let bbox = BoundingBox::new(
            self.north.unwrap_or(90.0),
            self.south.unwrap_or(-90.0),
            self.east.unwrap_or(180.0),
            self.west.unwrap_or(-180.0),
        );

        if ![bbox.north, bbox.south, bbox.east, bbox.west]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ClusterError::InvalidInput(
                "Viewport edges must be finite".to_string(),
            ));
        }

        if bbox.south > bbox.north {
            return Err(ClusterError::InvalidInput(format!(
                "South ({}) must not exceed north ({})",
                bbox.south, bbox.north
            )));
        }

        if bbox.west > bbox.east {
            return Err(ClusterError::InvalidInput(format!(
                "West ({}) must not exceed east ({})",
                bbox.west, bbox.east
            )));
        }

        let zoom = clamp_zoom(self.zoom.unwrap_or(DEFAULT_ZOOM), max_zoom);
        Ok((bbox, zoom))
    }
}

/// Serves clustered viewports from a post store.
///
/// # Examples
///
/// ```rust
/// use geocluster::{ClusterQuery, ClusterService, MemoryPostStore, PostStore};
/// use geocluster_types::GeotaggedRecord;
/// use std::time::SystemTime;
/// use uuid::Uuid;
///
/// let store = MemoryPostStore::new();
/// store.upsert(GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now()).at(41.0, 29.0))?;
///
/// let service = ClusterService::new(store);
/// let clusters = service.clusters(&ClusterQuery::new(42.0, 40.0, 30.0, 28.0, 6))?;
/// assert_eq!(clusters.len(), 1);
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
pub struct ClusterService<S: PostStore> {
    store: S,
    engine: ClusterEngine,
}

impl<S: PostStore> ClusterService<S> {
    pub fn new(store: S) -> Self {
        Self::with_engine(store, ClusterEngine::new())
    }

    pub fn with_engine(store: S, engine: ClusterEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &ClusterEngine {
        &self.engine
    }

    /// Clustered markers for the requested viewport, densest first.
    pub fn clusters(&self, query: &ClusterQuery) -> Result<Vec<ClusterSummary>> {
        let (bbox, zoom) = query.resolve(self.engine.config().max_zoom)?;
        let records = self.store.records_within(&bbox)?;

        log::debug!(
            "viewport n={} s={} e={} w={} zoom={}: {} records",
            bbox.north,
            bbox.south,
            bbox.east,
            bbox.west,
            zoom,
            records.len()
        );

        Ok(self.engine.compute(&bbox, zoom, &records))
    }

    /// [`clusters`](Self::clusters) serialized as a JSON array.
    pub fn clusters_json(&self, query: &ClusterQuery) -> Result<String> {
        let clusters = self.clusters(query)?;
        Ok(serde_json::to_string(&clusters)?)
    }
}
