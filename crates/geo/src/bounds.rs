//! Geographic bounding boxes over a southwest/northeast corner pair.

use crate::error::GeoError;
use crate::lnglat::LngLat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular geographic region bounded by its southwest and
/// northeast corners.
///
/// A box whose east edge is numerically west of its west edge
/// (`ne.lng < sw.lng`) is interpreted as crossing the antimeridian;
/// [`contains`](Self::contains) and [`center`](Self::center) honor that
/// interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    /// Southwest corner
    pub sw: LngLat,
    /// Northeast corner
    pub ne: LngLat,
}

impl LngLatBounds {
    /// Create bounds from southwest and northeast corners.
    pub fn new(sw: LngLat, ne: LngLat) -> Self {
        Self { sw, ne }
    }

    /// A degenerate box covering exactly one point.
    pub fn from_point(point: LngLat) -> Self {
        Self::new(point, point)
    }

    /// Western edge longitude.
    pub fn west(&self) -> f64 {
        self.sw.lng
    }

    /// Southern edge latitude.
    pub fn south(&self) -> f64 {
        self.sw.lat
    }

    /// Eastern edge longitude.
    pub fn east(&self) -> f64 {
        self.ne.lng
    }

    /// Northern edge latitude.
    pub fn north(&self) -> f64 {
        self.ne.lat
    }

    /// True when the box crosses the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.ne.lng < self.sw.lng
    }

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: &LngLat) -> &mut Self {
        self.sw.lng = self.sw.lng.min(point.lng);
        self.sw.lat = self.sw.lat.min(point.lat);
        self.ne.lng = self.ne.lng.max(point.lng);
        self.ne.lat = self.ne.lat.max(point.lat);
        self
    }

    /// Grow the box to include everything in `other`.
    pub fn extend_bounds(&mut self, other: &LngLatBounds) -> &mut Self {
        let (sw, ne) = (other.sw, other.ne);
        self.extend(&sw).extend(&ne)
    }

    /// True when `point` lies inside the box, edges included.
    pub fn contains(&self, point: &LngLat) -> bool {
        let lat_in = self.sw.lat <= point.lat && point.lat <= self.ne.lat;
        let lng_in = if self.crosses_antimeridian() {
            point.lng >= self.sw.lng || point.lng <= self.ne.lng
        } else {
            self.sw.lng <= point.lng && point.lng <= self.ne.lng
        };
        lat_in && lng_in
    }

    /// The geographic midpoint of the box. For boxes crossing the
    /// antimeridian the midpoint is computed on the unwrapped east edge
    /// and wrapped back into [-180, 180).
    pub fn center(&self) -> LngLat {
        let lat = (self.sw.lat + self.ne.lat) / 2.0;
        if self.crosses_antimeridian() {
            LngLat::new((self.sw.lng + self.ne.lng + 360.0) / 2.0, lat).wrap()
        } else {
            LngLat::new((self.sw.lng + self.ne.lng) / 2.0, lat)
        }
    }

    /// The box as `[west, south, east, north]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.sw.lng, self.sw.lat, self.ne.lng, self.ne.lat]
    }
}

impl fmt::Display for LngLatBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.sw.lng, self.sw.lat, self.ne.lng, self.ne.lat
        )
    }
}

impl TryFrom<[f64; 4]> for LngLatBounds {
    type Error = GeoError;

    /// Build bounds from `[west, south, east, north]`. An inverted
    /// longitude range is legal (antimeridian crossing); an inverted
    /// latitude range is not.
    fn try_from(values: [f64; 4]) -> Result<Self, Self::Error> {
        let [west, south, east, north] = values;
        if south > north {
            return Err(GeoError::InvertedLatitude { south, north });
        }
        Ok(Self::new(LngLat::new(west, south), LngLat::new(east, north)))
    }
}
