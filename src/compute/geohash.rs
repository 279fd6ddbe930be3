//! Geohash encoding and decoding.
//!
//! A geohash interleaves bisections of the longitude range [-180, 180] and
//! the latitude range [-90, 90], longitude first, and emits one base-32
//! symbol per five bits. Every prefix of a hash names a rectangle that
//! contains the rectangles of all longer hashes sharing that prefix.
//!
//! Decoding is deliberately lenient: symbols outside the alphabet are
//! skipped instead of rejected, because cached hashes written by older
//! code paths are decoded on the hot path. Use [`parse`] where strict
//! validation is wanted.

use crate::error::{ClusterError, Result};
use geo::Rect;
use geocluster_types::{GeoPoint, GeotaggedRecord};
use std::borrow::Cow;

/// Geohash base-32 alphabet (no `a`, `i`, `l`, `o`).
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

pub const MIN_PRECISION: usize = 1;
pub const MAX_PRECISION: usize = 12;
/// Used when a caller asks for a precision outside [1, 12]
pub const DEFAULT_PRECISION: usize = 9;

const INVALID: u8 = 0xff;

const DECODE_TABLE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < BASE32.len() {
        table[BASE32[i] as usize] = i as u8;
        i += 1;
    }
    table
};

fn symbol_index(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        idx => Some(idx),
    }
}

/// The rectangle named by a geohash prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeohashBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeohashBounds {
    fn world() -> Self {
        Self {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lng: -180.0,
            max_lng: 180.0,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
    }

    /// Check if `other` lies entirely inside this rectangle.
    pub fn contains_bounds(&self, other: &GeohashBounds) -> bool {
        other.min_lat >= self.min_lat
            && other.max_lat <= self.max_lat
            && other.min_lng >= self.min_lng
            && other.max_lng <= self.max_lng
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Convert to a `geo::Rect` with longitude on the x axis.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.min_lng, y: self.min_lat },
            geo::coord! { x: self.max_lng, y: self.max_lat },
        )
    }
}

/// Encode a coordinate into a geohash of `precision` symbols.
///
/// Precisions outside [1, 12] fall back to 9.
///
/// # Examples
///
/// ```
/// use geocluster::compute::geohash::encode;
///
/// assert_eq!(encode(57.64911, 10.40744, 11), "u4pruydqqvj");
/// assert_eq!(encode(57.64911, 10.40744, 0).len(), 9);
/// ```
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> String {
    let precision = if (MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        precision
    } else {
        DEFAULT_PRECISION
    };

    let mut bounds = GeohashBounds::world();
    let mut hash = String::with_capacity(precision);
    let mut ch = 0usize;
    let mut bit = 0;
    let mut even = true;

    while hash.len() < precision {
        if even {
            let mid = (bounds.min_lng + bounds.max_lng) / 2.0;
            if longitude > mid {
                ch |= 1 << (4 - bit);
                bounds.min_lng = mid;
            } else {
                bounds.max_lng = mid;
            }
        } else {
            let mid = (bounds.min_lat + bounds.max_lat) / 2.0;
            if latitude > mid {
                ch |= 1 << (4 - bit);
                bounds.min_lat = mid;
            } else {
                bounds.max_lat = mid;
            }
        }
        even = !even;

        if bit < 4 {
            bit += 1;
        } else {
            hash.push(BASE32[ch] as char);
            bit = 0;
            ch = 0;
        }
    }

    hash
}

/// Decode a geohash prefix into the rectangle it names.
///
/// Unknown symbols are skipped. An empty (or entirely unknown) input
/// decodes to the whole world.
///
/// # Examples
///
/// ```
/// use geocluster::compute::geohash::{decode_bounds, encode};
/// use geocluster_types::GeoPoint;
///
/// let hash = encode(39.9334, 32.8597, 7);
/// let bounds = decode_bounds(&hash);
/// assert!(bounds.contains(&GeoPoint::new(39.9334, 32.8597)));
/// ```
pub fn decode_bounds(geohash: &str) -> GeohashBounds {
    let mut bounds = GeohashBounds::world();
    let mut even = true;

    for idx in geohash.chars().filter_map(symbol_index) {
        for shift in (0..5).rev() {
            let set = (idx >> shift) & 1 == 1;
            if even {
                let mid = (bounds.min_lng + bounds.max_lng) / 2.0;
                if set {
                    bounds.min_lng = mid;
                } else {
                    bounds.max_lng = mid;
                }
            } else {
                let mid = (bounds.min_lat + bounds.max_lat) / 2.0;
                if set {
                    bounds.min_lat = mid;
                } else {
                    bounds.max_lat = mid;
                }
            }
            even = !even;
        }
    }

    bounds
}

/// Decode a geohash to the center of its rectangle.
pub fn decode(geohash: &str) -> GeoPoint {
    decode_bounds(geohash).center()
}

/// Strictly validate a geohash and normalize it to lower case.
pub fn parse(geohash: &str) -> Result<String> {
    if geohash.is_empty() {
        return Err(ClusterError::InvalidGeohash(
            "geohash must not be empty".to_string(),
        ));
    }

    let normalized = geohash.to_ascii_lowercase();
    if normalized.chars().count() > MAX_PRECISION {
        return Err(ClusterError::InvalidGeohash(format!(
            "geohash longer than {} symbols: {}",
            MAX_PRECISION, geohash
        )));
    }

    if let Some(bad) = normalized.chars().find(|c| symbol_index(*c).is_none()) {
        return Err(ClusterError::InvalidGeohash(format!(
            "unknown symbol {:?} in {}",
            bad, geohash
        )));
    }

    Ok(normalized)
}

/// The first `prefix_len` symbols of a record's geohash.
///
/// The cached hash is reused when it is long enough; otherwise the prefix
/// is recomputed from the coordinate. Records without a coordinate yield
/// `None`.
pub fn effective_geohash(record: &GeotaggedRecord, prefix_len: usize) -> Option<Cow<'_, str>> {
    let coord = record.coordinate?;

    if let Some(prefix) = record
        .geohash
        .as_deref()
        .filter(|hash| hash.len() >= prefix_len)
        .and_then(|hash| hash.get(..prefix_len))
    {
        return Some(Cow::Borrowed(prefix));
    }

    Some(Cow::Owned(encode(coord.latitude, coord.longitude, prefix_len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;
    use uuid::Uuid;

    #[test]
    fn test_known_hashes() {
        assert_eq!(encode(57.64911, 10.40744, 11), "u4pruydqqvj");
        assert_eq!(encode(42.6, -5.6, 5), "ezs42");
        assert_eq!(encode(35.3003, -120.6623, 5), "9q60y");
    }

    #[test]
    fn test_precision_fallback() {
        assert_eq!(encode(10.0, 10.0, 0).len(), DEFAULT_PRECISION);
        assert_eq!(encode(10.0, 10.0, 13).len(), DEFAULT_PRECISION);
        assert_eq!(encode(10.0, 10.0, 1).len(), 1);
        assert_eq!(encode(10.0, 10.0, 12).len(), 12);
    }

    #[test]
    fn test_decode_skips_unknown_symbols() {
        assert_eq!(decode_bounds("ez!s4a2"), decode_bounds("ezs42"));
        assert_eq!(decode_bounds(""), GeohashBounds::world());
        assert_eq!(decode_bounds("ÄÖ"), GeohashBounds::world());
    }

    #[test]
    fn test_decode_center() {
        let center = decode("ezs42");
        assert!((center.latitude - 42.605).abs() < 0.01);
        assert!((center.longitude - (-5.603)).abs() < 0.01);
    }

    #[test]
    fn test_extreme_points_contained() {
        let corners = [
            (90.0, 180.0),
            (-90.0, -180.0),
            (90.0, -180.0),
            (-90.0, 180.0),
            (0.0, 0.0),
        ];
        for (lat, lon) in corners {
            for p in MIN_PRECISION..=MAX_PRECISION {
                let bounds = decode_bounds(&encode(lat, lon, p));
                assert!(
                    bounds.contains(&GeoPoint::new(lat, lon)),
                    "({lat}, {lon}) escaped its precision-{p} cell"
                );
            }
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("EZS42").unwrap(), "ezs42");
        assert!(matches!(parse(""), Err(ClusterError::InvalidGeohash(_))));
        assert!(matches!(parse("ezsa2"), Err(ClusterError::InvalidGeohash(_))));
        assert!(matches!(
            parse("0123456789bcd"),
            Err(ClusterError::InvalidGeohash(_))
        ));
    }

    fn record_at(lat: f64, lon: f64) -> GeotaggedRecord {
        GeotaggedRecord::new(Uuid::new_v4(), SystemTime::UNIX_EPOCH).at(lat, lon)
    }

    #[test]
    fn test_effective_geohash_reuses_cache() {
        // Deliberately stale cache: the cached value wins when long enough.
        let record = record_at(0.0, 0.0).with_geohash("ezs42abc");
        let hash = effective_geohash(&record, 5).unwrap();
        assert!(matches!(hash, Cow::Borrowed("ezs42")));
    }

    #[test]
    fn test_effective_geohash_recomputes_short_cache() {
        let record = record_at(42.6, -5.6).with_geohash("ez");
        let hash = effective_geohash(&record, 5).unwrap();
        assert_eq!(hash, "ezs42");
        assert!(matches!(hash, Cow::Owned(_)));
    }

    #[test]
    fn test_effective_geohash_without_coordinate() {
        let record = GeotaggedRecord::new(Uuid::new_v4(), SystemTime::UNIX_EPOCH)
            .with_geohash("ezs42");
        assert!(effective_geohash(&record, 3).is_none());
    }
}
