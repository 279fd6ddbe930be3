use crate::point::GeoPoint;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One marker on the map: a cluster of posts or a single post.
///
/// Serializes to the shape map clients consume:
///
/// ```json
/// { "latitude": 41.0, "longitude": 29.0, "postsCount": 1, "isCluster": false,
///   "samplePostIds": ["..."], "placeId": "...", "placeName": "X", "city": "Y" }
/// ```
///
/// The place fields are only ever populated for single-post summaries and
/// are omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    #[serde(flatten)]
    pub centroid: GeoPoint,
    #[serde(rename = "postsCount")]
    pub member_count: usize,
    pub is_cluster: bool,
    /// Newest first
    #[serde(rename = "samplePostIds")]
    pub sample_ids: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl ClusterSummary {
    /// Latitude of the centroid.
    pub fn latitude(&self) -> f64 {
        self.centroid.latitude
    }

    /// Longitude of the centroid.
    pub fn longitude(&self) -> f64 {
        self.centroid.longitude
    }
}
