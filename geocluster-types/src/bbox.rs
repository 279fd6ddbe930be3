use crate::point::GeoPoint;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A map viewport expressed as north/south/east/west edges in degrees.
///
/// The box is stored exactly as the caller supplied it. It is *not*
/// normalized, so an inverted or zero-area box stays inverted and the
/// engine can recognise it as a degenerate viewport. Boxes crossing the
/// antimeridian (`west > east`) are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(41.2, 40.8, 29.4, 28.6);
    /// assert!((bbox.lat_span() - 0.4).abs() < 1e-9);
    /// ```
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// The whole world.
    pub fn world() -> Self {
        Self::new(90.0, -90.0, 180.0, -180.0)
    }

    /// `north - south`
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// `east - west`
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Get the center point of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Check if a point lies inside the box (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// Convert to a `geo::Rect` with longitude on the x axis.
    ///
    /// `geo::Rect` normalizes its corners, so only call this on a box that
    /// has already been validated.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }
}
