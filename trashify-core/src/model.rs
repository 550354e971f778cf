//! Domain data structures for coordinates, disposal points, and query state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::appearance::AppearanceStyle;
use crate::ports::{SearchError, SearchErrorKind};

/// Map span shown around a centered coordinate, in degrees.
pub const REGION_SPAN_DEGREES: f64 = 0.05;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
/// A latitude/longitude pair outside the WGS84 ranges.
pub struct InvalidCoordinate {
    /// Rejected latitude.
    pub latitude: f64,
    /// Rejected longitude.
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
/// A WGS84 position. Latitude is within `[-90, 90]`, longitude within `[-180, 180]`.
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] for out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opaque server identifier of a disposal point.
pub struct PointId(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A server-known place accepting one category of waste.
pub struct DisposalPoint {
    /// Identifier, unique within one response.
    pub id: PointId,
    /// Where the point is.
    pub location: Coordinate,
    /// Open-ended category tag such as `paper` or `batteries`.
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Distance band, in meters, around a search origin.
pub struct SearchRadius {
    /// Inner bound, if any.
    pub min_m: Option<u32>,
    /// Outer bound, if any.
    pub max_m: Option<u32>,
}

impl SearchRadius {
    /// Band used for location selections and the first device fix.
    pub const DEFAULT: Self = Self {
        min_m: Some(0),
        max_m: Some(1500),
    };
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A validated proximity search. Both bounds present implies `min <= max`.
pub struct SearchQuery {
    origin: Coordinate,
    min_distance_m: Option<u32>,
    max_distance_m: Option<u32>,
}

impl SearchQuery {
    /// Build a query around `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] when the minimum distance exceeds the maximum.
    pub fn new(
        origin: Coordinate,
        min_distance_m: Option<u32>,
        max_distance_m: Option<u32>,
    ) -> Result<Self, SearchError> {
        if let (Some(min), Some(max)) = (min_distance_m, max_distance_m)
            && min > max
        {
            return Err(SearchError::InvalidQuery(format!(
                "minimum distance {min}m exceeds maximum distance {max}m"
            )));
        }

        Ok(Self {
            origin,
            min_distance_m,
            max_distance_m,
        })
    }

    /// Build a query around `origin` using the bounds of `radius`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] when the radius bounds are inverted.
    pub fn within(origin: Coordinate, radius: SearchRadius) -> Result<Self, SearchError> {
        Self::new(origin, radius.min_m, radius.max_m)
    }

    /// Center of the search.
    #[must_use]
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Inner distance bound in meters.
    #[must_use]
    pub fn min_distance_m(&self) -> Option<u32> {
        self.min_distance_m
    }

    /// Outer distance bound in meters.
    #[must_use]
    pub fn max_distance_m(&self) -> Option<u32> {
        self.max_distance_m
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Sequence number of an issued query. Later queries have larger ids.
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Lifecycle of the current proximity query.
pub enum QueryState {
    /// Nothing has been asked yet.
    #[default]
    Idle,
    /// The latest query is in flight.
    Loading,
    /// The latest query returned these points, in server order.
    Loaded(Vec<DisposalPoint>),
    /// The latest query failed.
    Failed {
        /// Which stage failed.
        kind: SearchErrorKind,
        /// Human-readable message for display.
        reason: String,
    },
}

impl QueryState {
    /// Whether a query is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A disposal point paired with the style it is drawn with.
pub struct Annotation {
    /// The underlying point.
    pub point: DisposalPoint,
    /// Color and icon derived from the point's category.
    pub style: AppearanceStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Visible map area, as a center and a square span.
pub struct MapRegion {
    /// Center of the view.
    pub center: Coordinate,
    /// Latitude and longitude delta shown, in degrees.
    pub span_degrees: f64,
}

impl MapRegion {
    /// Region of the default span centered on `center`.
    #[must_use]
    pub fn around(center: Coordinate) -> Self {
        Self {
            center,
            span_degrees: REGION_SPAN_DEGREES,
        }
    }
}
