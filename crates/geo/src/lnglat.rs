//! Geographic points as longitude/latitude pairs in degrees.

use crate::error::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic point, longitude first, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees
    pub lng: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl LngLat {
    /// Create a point from longitude and latitude.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Return a copy with the longitude normalized into [-180, 180).
    /// Latitude is left untouched.
    pub fn wrap(self) -> Self {
        Self {
            lng: (self.lng + 180.0).rem_euclid(360.0) - 180.0,
            lat: self.lat,
        }
    }

    /// The point as `[lng, lat]`.
    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

impl FromStr for LngLat {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lng), Some(lat), None) => {
                Ok(Self::new(lng.trim().parse()?, lat.trim().parse()?))
            }
            _ => Err(GeoError::InvalidCoordinateString(s.to_string())),
        }
    }
}
