#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![allow(clippy::single_match)]

//! the rectform-compose crate provides the building blocks for transforming geographic shapes:
//! coordinates and bounds, projections, the affine matrix and the shapes it is applied to.

// Modules
/// colors
pub mod color;
/// Event result.
pub mod eventresult;
/// module for extension traits for foreign types
pub mod ext;
/// geographic coordinates, bounds and rings
pub mod geo;
/// geodesic helpers for real-world grid extents
pub mod geodesy;
/// module for pointer events
pub mod pointerevent;
/// projections between geographic and flat space
pub mod projection;
/// module for shapes
pub mod shapes;
/// module for transformation
pub mod transform;

// Re-exports
pub use color::Color;
pub use eventresult::EventResult;
pub use geo::{GeoCoordinate, LatLngBounds, LatLngs};
pub use pointerevent::{GestureProgress, PointerElement, PointerEvent};
pub use projection::{LonLat, Projection, SphericalMercator};
pub use transform::{AffineMatrix, GeoTarget, GeoTransformable};

// Renames
extern crate nalgebra as na;
