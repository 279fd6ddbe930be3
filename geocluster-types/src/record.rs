use crate::point::GeoPoint;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// The place a post was tagged with, as loaded alongside the post.
///
/// Older posts carry their location only through the place, so its
/// coordinate and names act as a fallback for the post's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub id: Uuid,
    pub name: Option<String>,
    pub city: Option<String>,
    pub coordinate: Option<GeoPoint>,
}

impl PlaceRef {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            name: None,
            city: None,
            coordinate: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some(GeoPoint::new(latitude, longitude));
        self
    }
}

/// A geotagged post as handed to the clustering engine.
///
/// `geohash` is a denormalized cache maintained by the backfill process. It
/// may be stale, short or missing; the engine only treats it as a hint.
///
/// # Examples
///
/// ```
/// use geocluster_types::record::GeotaggedRecord;
/// use std::time::SystemTime;
/// use uuid::Uuid;
///
/// let record = GeotaggedRecord::new(Uuid::new_v4(), SystemTime::now())
///     .at(41.0, 29.0)
///     .with_place_name("Galata Tower")
///     .with_city("Istanbul");
/// assert!(record.coordinate.is_some());
/// assert!(record.geohash.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeotaggedRecord {
    pub id: Uuid,
    pub coordinate: Option<GeoPoint>,
    pub geohash: Option<String>,
    pub created_at: SystemTime,
    /// Display name of the tagged location
    #[serde(alias = "display_name")]
    pub place_name: Option<String>,
    pub city: Option<String>,
    pub place_id: Option<Uuid>,
    pub place: Option<PlaceRef>,
}

impl GeotaggedRecord {
    /// Create a record with no location data.
    pub fn new(id: Uuid, created_at: SystemTime) -> Self {
        Self {
            id,
            coordinate: None,
            geohash: None,
            created_at,
            place_name: None,
            city: None,
            place_id: None,
            place: None,
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some(GeoPoint::new(latitude, longitude));
        self
    }

    pub fn with_geohash(mut self, geohash: impl Into<String>) -> Self {
        self.geohash = Some(geohash.into());
        self
    }

    pub fn with_place_name(mut self, name: impl Into<String>) -> Self {
        self.place_name = Some(name.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Attach a place; also sets `place_id`.
    pub fn with_place(mut self, place: PlaceRef) -> Self {
        self.place_id = Some(place.id);
        self.place = Some(place);
        self
    }

    /// Place name, falling back to the associated place.
    pub fn effective_place_name(&self) -> Option<&str> {
        self.place_name
            .as_deref()
            .or_else(|| self.place.as_ref().and_then(|p| p.name.as_deref()))
    }

    /// City, falling back to the associated place.
    pub fn effective_city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or_else(|| self.place.as_ref().and_then(|p| p.city.as_deref()))
    }
}
