//! Validation for coordinates and viewports.

use crate::error::{ClusterError, Result};
use geocluster_types::{BoundingBox, GeoPoint};

/// Validates a point has finite, in-range latitude and longitude.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_geographic_point;
/// use geocluster_types::GeoPoint;
///
/// assert!(validate_geographic_point(&GeoPoint::new(41.0, 29.0)).is_ok());
/// assert!(validate_geographic_point(&GeoPoint::new(95.0, 29.0)).is_err());
/// assert!(validate_geographic_point(&GeoPoint::new(41.0, 200.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &GeoPoint) -> Result<()> {
    let (lat, lng) = (point.latitude, point.longitude);

    if !lat.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !lng.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            lng
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ClusterError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lng) {
        return Err(ClusterError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lng
        )));
    }

    Ok(())
}

/// Whether the engine can cluster inside this viewport.
///
/// Requires `north > south` and `east > west`. Comparisons involving NaN
/// are false, so a NaN edge also makes the viewport unusable.
pub fn is_valid_viewport(bbox: &BoundingBox) -> bool {
    bbox.north > bbox.south && bbox.east > bbox.west
}

/// Validates a bounding box: every edge is a valid coordinate and the box
/// has positive area. Antimeridian-crossing boxes are rejected.
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_bbox;
/// use geocluster_types::BoundingBox;
///
/// assert!(validate_bbox(&BoundingBox::new(41.2, 40.8, 29.4, 28.6)).is_ok());
/// assert!(validate_bbox(&BoundingBox::new(10.0, 10.0, 20.0, 5.0)).is_err());
/// assert!(validate_bbox(&BoundingBox::new(10.0, 0.0, -170.0, 170.0)).is_err());
/// ```
pub fn validate_bbox(bbox: &BoundingBox) -> Result<()> {
    validate_geographic_point(&GeoPoint::new(bbox.north, bbox.east))
        .map_err(|e| ClusterError::InvalidInput(format!("North-east corner: {}", e)))?;
    validate_geographic_point(&GeoPoint::new(bbox.south, bbox.west))
        .map_err(|e| ClusterError::InvalidInput(format!("South-west corner: {}", e)))?;

    if !is_valid_viewport(bbox) {
        return Err(ClusterError::InvalidInput(format!(
            "Bounding box must satisfy north > south and east > west: {:?}",
            bbox
        )));
    }

    Ok(())
}
