use geo::Point;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees.
///
/// Latitude comes first, matching how map clients and the post store talk
/// about positions. Conversions to `geo::Point` put longitude on the x axis.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::GeoPoint;
///
/// let istanbul = GeoPoint::new(41.0082, 28.9784);
/// let point: geo::Point = istanbul.into();
/// assert_eq!(point.x(), 28.9784);
/// assert_eq!(point.y(), 41.0082);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in [-90, 90]
    pub latitude: f64,
    /// Longitude in [-180, 180]
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Largest per-axis difference to another point, in degrees.
    pub fn max_axis_delta(&self, other: &GeoPoint) -> f64 {
        (self.latitude - other.latitude)
            .abs()
            .max((self.longitude - other.longitude).abs())
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.longitude, p.latitude)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}
