//! Configuration for the clustering engine.
//!
//! The defaults reproduce the production map behaviour: at most 500
//! markers, 10 sample posts per marker, geohash clustering up to zoom 9
//! and tile clustering above it.
use crate::error::{ClusterError, Result};
use serde::de::Error;
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Upper bound on the number of summaries returned per request
    #[serde(default = "ClusterConfig::default_max_clusters")]
    pub max_clusters: usize,

    /// Sample record ids kept per summary
    #[serde(default = "ClusterConfig::default_max_samples")]
    pub max_samples: usize,

    /// Highest zoom clustered by geohash prefix; above it tiles are used
    #[serde(default = "ClusterConfig::default_geohash_max_zoom")]
    pub geohash_max_zoom: i32,

    #[serde(default = "ClusterConfig::default_max_zoom")]
    pub max_zoom: i32,

    /// Smallest tile edge in degrees
    #[serde(default = "ClusterConfig::default_min_cell_size")]
    pub min_cell_size: f64,

    /// Largest tile edge in degrees
    #[serde(default = "ClusterConfig::default_max_cell_size")]
    pub max_cell_size: f64,

    /// Record count at which grouping moves onto the rayon pool
    #[serde(default = "ClusterConfig::default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl ClusterConfig {
    const fn default_max_clusters() -> usize {
        500
    }

    const fn default_max_samples() -> usize {
        10
    }

    const fn default_geohash_max_zoom() -> i32 {
        9
    }

    const fn default_max_zoom() -> i32 {
        18
    }

    const fn default_min_cell_size() -> f64 {
        0.001
    }

    const fn default_max_cell_size() -> f64 {
        1.0
    }

    const fn default_parallel_threshold() -> usize {
        50_000
    }

    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        assert!(max_clusters > 0, "Max clusters must be greater than zero");

        if max_clusters > 10_000 {
            log::warn!(
                "Max clusters of {} is very large; map clients may struggle to render that many markers",
                max_clusters
            );
        }

        self.max_clusters = max_clusters;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        assert!(max_samples > 0, "Max samples must be greater than zero");
        self.max_samples = max_samples;
        self
    }

    pub fn with_geohash_max_zoom(mut self, zoom: i32) -> Self {
        self.geohash_max_zoom = zoom;
        self
    }

    pub fn with_cell_size_limits(mut self, min: f64, max: f64) -> Self {
        assert!(
            min > 0.0 && min <= max,
            "Cell size limits must satisfy 0 < min <= max"
        );
        self.min_cell_size = min;
        self.max_cell_size = max;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_clusters == 0 {
            return Err("Max clusters must be greater than zero".to_string());
        }

        if self.max_samples == 0 {
            return Err("Max samples must be greater than zero".to_string());
        }

        if self.max_zoom < 0 {
            return Err(format!("Max zoom must not be negative, got {}", self.max_zoom));
        }

        if self.geohash_max_zoom > self.max_zoom {
            return Err(format!(
                "Geohash max zoom {} exceeds max zoom {}",
                self.geohash_max_zoom, self.max_zoom
            ));
        }

        if !self.min_cell_size.is_finite() || !self.max_cell_size.is_finite() {
            return Err("Cell size limits must be finite".to_string());
        }

        if self.min_cell_size <= 0.0 || self.min_cell_size > self.max_cell_size {
            return Err(format!(
                "Cell size limits must satisfy 0 < min <= max, got min={} max={}",
                self.min_cell_size, self.max_cell_size
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: ClusterConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: ClusterConfig = serde_json::from_str(&contents)?;
        config.validate().map_err(ClusterError::Config)?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: ClusterConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_clusters: Self::default_max_clusters(),
            max_samples: Self::default_max_samples(),
            geohash_max_zoom: Self::default_geohash_max_zoom(),
            max_zoom: Self::default_max_zoom(),
            min_cell_size: Self::default_min_cell_size(),
            max_cell_size: Self::default_max_cell_size(),
            parallel_threshold: Self::default_parallel_threshold(),
        }
    }
}
