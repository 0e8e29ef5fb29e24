// Imports
use crate::GeoCoordinate;
use std::f64::consts::PI;

/// Converts between geographic coordinates and a flat, Euclidean space.
///
/// Affine math is only valid on the projected side. Implementations must be locally invertible
/// over the extent of the shapes they are used with.
pub trait Projection: std::fmt::Debug {
    /// Geographic to projected.
    fn project(&self, coord: GeoCoordinate) -> na::Point2<f64>;
    /// Projected to geographic.
    fn unproject(&self, point: na::Point2<f64>) -> GeoCoordinate;
}

/// Spherical mercator, the projection of web map tiles (EPSG:3857). Y points north.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalMercator;

impl SphericalMercator {
    /// Earth radius in meters.
    pub const R: f64 = 6378137.0;
    /// Latitudes beyond this are clamped, the projection diverges at the poles.
    pub const MAX_LATITUDE: f64 = 85.0511287798;
}

impl Projection for SphericalMercator {
    fn project(&self, coord: GeoCoordinate) -> na::Point2<f64> {
        let d = PI / 180.0;
        let lat = coord.lat.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let sin = (lat * d).sin();

        na::point![
            Self::R * coord.lng * d,
            Self::R * ((1.0 + sin) / (1.0 - sin)).ln() * 0.5
        ]
    }

    fn unproject(&self, point: na::Point2<f64>) -> GeoCoordinate {
        let d = 180.0 / PI;

        GeoCoordinate::new(
            (2.0 * (point[1] / Self::R).exp().atan() - PI * 0.5) * d,
            point[0] * d / Self::R,
        )
    }
}

/// Plate carrée with degrees as units: `x = lng`, `y = lat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LonLat;

impl Projection for LonLat {
    fn project(&self, coord: GeoCoordinate) -> na::Point2<f64> {
        na::point![coord.lng, coord.lat]
    }

    fn unproject(&self, point: na::Point2<f64>) -> GeoCoordinate {
        GeoCoordinate::new(point[1], point[0])
    }
}
