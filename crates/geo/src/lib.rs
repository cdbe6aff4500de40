//! Geographic Coordinate Utilities
//!
//! Pure, stateless longitude/latitude arithmetic for the map client:
//! [`LngLat`] points with antimeridian wrapping, and [`LngLatBounds`]
//! boxes with extend/contains/center operations that stay correct when
//! a box crosses the antimeridian.
//!
//! # Example
//!
//! ```rust
//! use geo::{LngLat, LngLatBounds};
//!
//! let mut bounds = LngLatBounds::from_point(LngLat::new(-73.98, 40.71));
//! bounds.extend(&LngLat::new(-73.94, 40.75));
//!
//! assert!(bounds.contains(&bounds.center()));
//! assert_eq!(bounds.to_array(), [-73.98, 40.71, -73.94, 40.75]);
//! ```

mod bounds;
mod error;
mod lnglat;

pub use bounds::LngLatBounds;
pub use error::GeoError;
pub use lnglat::LngLat;
